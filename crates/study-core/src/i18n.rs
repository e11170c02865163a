//! Localised labels shared by exports and the CLI

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// UI and export language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pt" | "pt-br" | "pt_br" => Ok(Language::Pt),
            "en" | "en-us" | "en_us" => Ok(Language::En),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

/// Text used when rendering subjects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub language: Language,
    pub yes: &'static str,
    pub no: &'static str,
    /// Shown for absent values
    pub placeholder: &'static str,
    pub title: &'static str,
    pub generated_at: &'static str,
    pub page: &'static str,
    pub records: &'static str,
    pub of: &'static str,
    /// Unit used when annotating names with their document count
    pub documents: &'static str,
    /// Shown when there is nothing to list
    pub empty: &'static str,
    /// Column headers, in export column order
    pub columns: [&'static str; 9],
}

impl Labels {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Pt => Self {
                language,
                yes: "Sim",
                no: "Não",
                placeholder: "-",
                title: "Exportação de Matérias",
                generated_at: "Gerado em",
                page: "Página",
                records: "registros",
                of: "de",
                documents: "PDFs",
                empty: "Nenhuma matéria cadastrada.",
                columns: [
                    "ID",
                    "Nome",
                    "Pasta",
                    "Mês",
                    "Concluída",
                    "Professor",
                    "Data de Criação",
                    "Data de Conclusão",
                    "Arquivos",
                ],
            },
            Language::En => Self {
                language,
                yes: "Yes",
                no: "No",
                placeholder: "-",
                title: "Subjects Export",
                generated_at: "Generated at",
                page: "Page",
                records: "records",
                of: "of",
                documents: "PDFs",
                empty: "No subjects recorded.",
                columns: [
                    "ID",
                    "Name",
                    "Folder",
                    "Month",
                    "Completed",
                    "Instructor",
                    "Created At",
                    "Completed At",
                    "Files",
                ],
            },
        }
    }

    /// Localised yes/no
    pub fn yes_no(&self, value: bool) -> &'static str {
        if value {
            self.yes
        } else {
            self.no
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("PT".parse::<Language>().unwrap(), Language::Pt);
        assert_eq!("en-US".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_yes_no() {
        let pt = Labels::for_language(Language::Pt);
        assert_eq!(pt.yes_no(true), "Sim");
        assert_eq!(pt.yes_no(false), "Não");
        let en = Labels::for_language(Language::En);
        assert_eq!(en.yes_no(false), "No");
    }
}
