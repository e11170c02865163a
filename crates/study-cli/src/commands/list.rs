//! List command
//!
//! List subjects, optionally filtered by status and month.

use anyhow::{anyhow, Result};
use clap::Args;

use study_core::subject::SubjectFilter;
use study_core::types::MonthSelection;

use crate::app::App;
use crate::output;

/// Arguments for the list command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only completed subjects
    #[arg(long, conflicts_with = "pending")]
    pub completed: bool,

    /// Only pending subjects
    #[arg(long)]
    pub pending: bool,

    /// Months to include: "janeiro,fevereiro" or "março-junho"
    #[arg(long, short)]
    pub months: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Completion filter from the status flags
    pub fn completed_filter(&self) -> Option<bool> {
        match (self.completed, self.pending) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    pub fn filter(&self) -> Result<SubjectFilter> {
        let mut filter = SubjectFilter::completed(self.completed_filter());
        if let Some(ref months) = self.months {
            let selection = MonthSelection::parse(months).map_err(|e| anyhow!(e))?;
            filter.months = Some(selection.months().to_vec());
        }
        Ok(filter)
    }
}

/// Execute the list command
pub fn execute(app: &App, args: ListArgs) -> Result<()> {
    let records = app.repo.search(&args.filter()?);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        output::print_table(&records, &app.labels());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::types::Month;

    fn args(completed: bool, pending: bool, months: Option<&str>) -> ListArgs {
        ListArgs {
            completed,
            pending,
            months: months.map(str::to_string),
            json: false,
        }
    }

    #[test]
    fn test_filter_from_flags() {
        assert_eq!(args(false, false, None).completed_filter(), None);
        assert_eq!(args(true, false, None).completed_filter(), Some(true));
        assert_eq!(args(false, true, None).completed_filter(), Some(false));
    }

    #[test]
    fn test_filter_months() {
        let filter = args(false, true, Some("março-maio")).filter().unwrap();
        assert_eq!(filter.completed, Some(false));
        assert_eq!(
            filter.months,
            Some(vec![Month::March, Month::April, Month::May])
        );
        assert!(args(false, false, Some("smarch")).filter().is_err());
    }
}
