//! Interactive menu
//!
//! A loop over the subject workflows. Errors from one action are reported and
//! the menu is shown again; only leaving the menu (or losing the terminal)
//! ends it.

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use study_core::config::Config;
use study_core::export::ExportFormat;
use study_core::i18n::Language;
use study_core::subject::{NewSubject, SubjectEdit, SubjectRecord};
use study_core::types::MonthSelection;

use crate::app::App;
use crate::output;

const PAGE_SIZE: usize = 10;

/// Menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Add,
    Show,
    ListMonth,
    ListDone,
    ListPending,
    MarkDone,
    Edit,
    Remove,
    Export,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 10] = [
        MenuItem::Add,
        MenuItem::Show,
        MenuItem::ListMonth,
        MenuItem::ListDone,
        MenuItem::ListPending,
        MenuItem::MarkDone,
        MenuItem::Edit,
        MenuItem::Remove,
        MenuItem::Export,
        MenuItem::Exit,
    ];

    /// Configuration key for label overrides
    pub fn key(self) -> &'static str {
        match self {
            MenuItem::Add => "add",
            MenuItem::Show => "show",
            MenuItem::ListMonth => "list_month",
            MenuItem::ListDone => "list_done",
            MenuItem::ListPending => "list_pending",
            MenuItem::MarkDone => "mark_done",
            MenuItem::Edit => "edit",
            MenuItem::Remove => "remove",
            MenuItem::Export => "export",
            MenuItem::Exit => "exit",
        }
    }

    fn default_label(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::Pt, MenuItem::Add) => "Adicionar matéria",
            (Language::Pt, MenuItem::Show) => "Mostrar matérias",
            (Language::Pt, MenuItem::ListMonth) => "Listar por mês",
            (Language::Pt, MenuItem::ListDone) => "Listar concluídas",
            (Language::Pt, MenuItem::ListPending) => "Listar pendentes",
            (Language::Pt, MenuItem::MarkDone) => "Marcar como concluída",
            (Language::Pt, MenuItem::Edit) => "Editar matéria",
            (Language::Pt, MenuItem::Remove) => "Remover matéria",
            (Language::Pt, MenuItem::Export) => "Exportar",
            (Language::Pt, MenuItem::Exit) => "Sair",
            (Language::En, MenuItem::Add) => "Add subject",
            (Language::En, MenuItem::Show) => "Show subjects",
            (Language::En, MenuItem::ListMonth) => "List by month",
            (Language::En, MenuItem::ListDone) => "List completed",
            (Language::En, MenuItem::ListPending) => "List pending",
            (Language::En, MenuItem::MarkDone) => "Mark as completed",
            (Language::En, MenuItem::Edit) => "Edit subject",
            (Language::En, MenuItem::Remove) => "Remove subject",
            (Language::En, MenuItem::Export) => "Export",
            (Language::En, MenuItem::Exit) => "Exit",
        }
    }
}

/// Prompt texts for one language
struct Prompts {
    name: &'static str,
    folder: &'static str,
    month: &'static str,
    instructor: &'static str,
    months: &'static str,
    pick: &'static str,
    formats: &'static str,
    confirm_done: &'static str,
    confirm_remove: &'static str,
    next: &'static str,
    previous: &'static str,
    back: &'static str,
    nothing: &'static str,
}

impl Prompts {
    fn for_language(language: Language) -> Self {
        match language {
            Language::Pt => Self {
                name: "Nome da matéria",
                folder: "Pasta dos PDFs",
                month: "Mês de início",
                instructor: "Professor (opcional)",
                months: "Meses (ex.: janeiro,fevereiro ou março-junho)",
                pick: "Escolha a matéria",
                formats: "Formatos",
                confirm_done: "Marcar como concluída?",
                confirm_remove: "Remover a matéria e seus arquivos?",
                next: "Próxima página",
                previous: "Página anterior",
                back: "Voltar",
                nothing: "Nenhuma matéria disponível.",
            },
            Language::En => Self {
                name: "Subject name",
                folder: "PDF folder",
                month: "Start month",
                instructor: "Instructor (optional)",
                months: "Months (e.g. january,february or march-june)",
                pick: "Pick a subject",
                formats: "Formats",
                confirm_done: "Mark as completed?",
                confirm_remove: "Remove the subject and its files?",
                next: "Next page",
                previous: "Previous page",
                back: "Back",
                nothing: "No subjects available.",
            },
        }
    }
}

/// Menu title and entry labels, configuration overrides applied
pub struct MenuLabels {
    pub title: String,
    pub items: Vec<(MenuItem, String)>,
}

impl MenuLabels {
    pub fn from_config(config: &Config) -> Self {
        let language = config.language();
        let default_title = match language {
            Language::Pt => "Gerenciador de Estudos",
            Language::En => "Study Tracker",
        };

        let title = config
            .menu_label("title")
            .unwrap_or(default_title)
            .to_string();
        let items = MenuItem::ALL
            .iter()
            .map(|&item| {
                let label = config
                    .menu_label(item.key())
                    .unwrap_or_else(|| item.default_label(language));
                (item, label.to_string())
            })
            .collect();

        Self { title, items }
    }

    pub fn label(&self, item: MenuItem) -> &str {
        self.items
            .iter()
            .find(|(i, _)| *i == item)
            .map(|(_, label)| label.as_str())
            .unwrap_or_default()
    }
}

/// Half-open index ranges of each page
pub fn pages(total: usize, page_size: usize) -> Vec<std::ops::Range<usize>> {
    let size = page_size.max(1);
    (0..total)
        .step_by(size)
        .map(|start| start..(start + size).min(total))
        .collect()
}

/// Execute the menu loop
pub fn execute(app: &App) -> Result<()> {
    let theme = ColorfulTheme::default();
    let labels = MenuLabels::from_config(&app.config);
    let entries: Vec<&str> = labels.items.iter().map(|(_, l)| l.as_str()).collect();

    loop {
        println!();
        let choice = Select::with_theme(&theme)
            .with_prompt(&labels.title)
            .items(&entries)
            .default(0)
            .interact_opt()?;

        let item = choice
            .map(|i| labels.items[i].0)
            .unwrap_or(MenuItem::Exit);

        if item == MenuItem::Exit {
            app.after_change();
            return Ok(());
        }

        if let Err(e) = run_item(app, &theme, item) {
            output::print_failure(&format!("{} {}: ", "✗".red(), labels.label(item)), &e);
        }
    }
}

fn run_item(app: &App, theme: &ColorfulTheme, item: MenuItem) -> Result<()> {
    let prompts = Prompts::for_language(app.language());
    let labels = app.labels();

    match item {
        MenuItem::Add => add(app, theme, &prompts),
        MenuItem::Show => show_paged(app, theme, &prompts, app.repo.list(None)),
        MenuItem::ListMonth => {
            let input: String = Input::with_theme(theme)
                .with_prompt(prompts.months)
                .interact_text()?;
            let selection = MonthSelection::parse(&input).map_err(|e| anyhow!(e))?;
            output::print_table(&app.repo.list_by_months(&selection), &labels);
            Ok(())
        }
        MenuItem::ListDone => {
            output::print_table(&app.repo.list(Some(true)), &labels);
            Ok(())
        }
        MenuItem::ListPending => {
            output::print_table(&app.repo.list(Some(false)), &labels);
            Ok(())
        }
        MenuItem::MarkDone => mark_done(app, theme, &prompts),
        MenuItem::Edit => edit(app, theme, &prompts),
        MenuItem::Remove => remove(app, theme, &prompts),
        MenuItem::Export => export(app, theme, &prompts),
        MenuItem::Exit => Ok(()),
    }
}

fn add(app: &App, theme: &ColorfulTheme, prompts: &Prompts) -> Result<()> {
    let name: String = Input::with_theme(theme)
        .with_prompt(prompts.name)
        .interact_text()?;
    let folder: String = Input::with_theme(theme)
        .with_prompt(prompts.folder)
        .interact_text()?;
    let month: String = Input::with_theme(theme)
        .with_prompt(prompts.month)
        .interact_text()?;
    let instructor: String = Input::with_theme(theme)
        .with_prompt(prompts.instructor)
        .allow_empty(true)
        .interact_text()?;

    let mut subject = NewSubject::new(name, folder, month);
    if !instructor.trim().is_empty() {
        subject = subject.with_instructor(instructor);
    }

    let record = app.repo.insert_with(subject).map_err(output::repo_error)?;
    output::print_success(&format!(
        "'{}' (ID {}): {} PDF(s)",
        record.name,
        record.id,
        record.file_count()
    ));
    app.organize(&record);
    app.after_change();
    Ok(())
}

fn show_paged(
    app: &App,
    theme: &ColorfulTheme,
    prompts: &Prompts,
    records: Vec<SubjectRecord>,
) -> Result<()> {
    let labels = app.labels();
    let pages = pages(records.len(), PAGE_SIZE);
    if pages.is_empty() {
        output::print_table(&records, &labels);
        return Ok(());
    }

    let mut current = 0;
    loop {
        let range = pages[current].clone();
        for record in &records[range] {
            output::print_detail(record, &labels);
            println!();
        }
        println!("{} {}/{}", labels.page, current + 1, pages.len());

        let mut options = Vec::new();
        if current + 1 < pages.len() {
            options.push(prompts.next);
        }
        if current > 0 {
            options.push(prompts.previous);
        }
        options.push(prompts.back);

        let choice = Select::with_theme(theme)
            .items(&options)
            .default(0)
            .interact_opt()?;
        match choice.map(|i| options[i]) {
            Some(o) if o == prompts.next => current += 1,
            Some(o) if o == prompts.previous => current -= 1,
            _ => return Ok(()),
        }
    }
}

/// Let the user pick one of `records`; `None` when there is nothing to pick
fn pick_subject(
    theme: &ColorfulTheme,
    prompts: &Prompts,
    records: &[SubjectRecord],
) -> Result<Option<SubjectRecord>> {
    if records.is_empty() {
        println!("{}", prompts.nothing);
        return Ok(None);
    }

    let items: Vec<String> = records
        .iter()
        .map(|r| format!("{:>4}  {} ({})", r.id, r.name, r.month))
        .collect();
    let choice = Select::with_theme(theme)
        .with_prompt(prompts.pick)
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(choice.map(|i| records[i].clone()))
}

fn mark_done(app: &App, theme: &ColorfulTheme, prompts: &Prompts) -> Result<()> {
    let Some(record) = pick_subject(theme, prompts, &app.repo.list(Some(false)))? else {
        return Ok(());
    };

    let confirmed = Confirm::with_theme(theme)
        .with_prompt(format!("{} ({})", prompts.confirm_done, record.name))
        .default(true)
        .interact()?;
    if !confirmed {
        return Ok(());
    }

    if app.repo.update_completion(record.id, true).is_none() {
        bail!("subject {} was not updated", record.id);
    }
    app.after_change();
    Ok(())
}

fn edit(app: &App, theme: &ColorfulTheme, prompts: &Prompts) -> Result<()> {
    let Some(record) = pick_subject(theme, prompts, &app.repo.list(None))? else {
        return Ok(());
    };

    let name: String = Input::with_theme(theme)
        .with_prompt(prompts.name)
        .with_initial_text(record.name.clone())
        .interact_text()?;
    let folder: String = Input::with_theme(theme)
        .with_prompt(prompts.folder)
        .with_initial_text(record.folder.clone())
        .interact_text()?;
    let month: String = Input::with_theme(theme)
        .with_prompt(prompts.month)
        .with_initial_text(record.month.canonical())
        .interact_text()?;
    let instructor: String = Input::with_theme(theme)
        .with_prompt(prompts.instructor)
        .with_initial_text(record.instructor.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let edit = SubjectEdit {
        name: (name != record.name).then_some(name),
        folder: (folder != record.folder).then_some(folder),
        month: (month.trim() != record.month.canonical()).then_some(month),
        instructor: (Some(instructor.as_str()) != record.instructor.as_deref()
            && !(instructor.is_empty() && record.instructor.is_none()))
        .then_some(instructor),
    };
    if edit.is_empty() {
        return Ok(());
    }

    match app.repo.update(record.id, edit).map_err(output::repo_error)? {
        Some(updated) => {
            output::print_success(&format!("'{}' (ID {})", updated.name, updated.id));
            app.after_change();
            Ok(())
        }
        None => bail!("subject {} no longer exists", record.id),
    }
}

fn remove(app: &App, theme: &ColorfulTheme, prompts: &Prompts) -> Result<()> {
    let Some(record) = pick_subject(theme, prompts, &app.repo.list(None))? else {
        return Ok(());
    };

    let confirmed = Confirm::with_theme(theme)
        .with_prompt(format!("{} ({})", prompts.confirm_remove, record.name))
        .default(false)
        .interact()?;
    if !confirmed {
        return Ok(());
    }

    if !app.repo.delete(record.id) {
        bail!("subject {} was not removed", record.id);
    }
    output::print_success(&format!("'{}' (ID {})", record.name, record.id));
    app.after_change();
    Ok(())
}

fn export(app: &App, theme: &ColorfulTheme, prompts: &Prompts) -> Result<()> {
    let configured = &app.config.export.formats;
    let available = app.available_formats();
    let items: Vec<&str> = available.iter().map(|f| f.name()).collect();
    let defaults: Vec<bool> = available
        .iter()
        .map(|f| {
            configured
                .iter()
                .any(|c| c.parse::<ExportFormat>().map(|p| p == *f).unwrap_or(false))
        })
        .collect();

    let chosen = MultiSelect::with_theme(theme)
        .with_prompt(prompts.formats)
        .items(&items)
        .defaults(&defaults)
        .interact()?;
    if chosen.is_empty() {
        return Ok(());
    }

    let formats: Vec<&str> = chosen.into_iter().map(|i| items[i]).collect();
    let settings = &app.config.export;
    let report = app.export(
        &app.repo.list(None),
        formats.as_slice(),
        &settings.directory,
        &settings.base_name,
    );
    output::print_export_report(&report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_labels_defaults() {
        let labels = MenuLabels::from_config(&Config::default());
        assert_eq!(labels.title, "Gerenciador de Estudos");
        assert_eq!(labels.items.len(), 10);
        assert_eq!(labels.label(MenuItem::Exit), "Sair");
    }

    #[test]
    fn test_menu_labels_overrides() {
        let mut config = Config::default();
        config.language = "en".to_string();
        config.menu.insert("add".to_string(), "Nova matéria".to_string());
        config.menu.insert("title".to_string(), "Estudos".to_string());

        let labels = MenuLabels::from_config(&config);
        assert_eq!(labels.title, "Estudos");
        assert_eq!(labels.label(MenuItem::Add), "Nova matéria");
        assert_eq!(labels.label(MenuItem::Remove), "Remove subject");
    }

    #[test]
    fn test_menu_keys_are_configurable() {
        for item in MenuItem::ALL {
            assert!(study_core::config::MENU_KEYS.contains(&item.key()));
        }
    }

    #[test]
    fn test_pages() {
        assert!(pages(0, 10).is_empty());
        assert_eq!(pages(10, 10), vec![0..10]);
        assert_eq!(pages(23, 10), vec![0..10, 10..20, 20..23]);
    }
}
