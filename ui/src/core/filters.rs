//! Filter selections and the option lists the backend currently offers.

use std::collections::BTreeSet;

use api::{query, FilterOption, FilterOptionsPayload, Query};

/// Day window restored by "reset filters".
pub const DEFAULT_DAY_WINDOW: u32 = 30;

/// Multi-select filter dimensions. The day window is a single value and is
/// handled separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Parameters,
    Techniques,
    Cycles,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Self::Parameters, Self::Techniques, Self::Cycles];

    pub fn query_key(self) -> &'static str {
        match self {
            Self::Parameters => query::PARAMETERS,
            Self::Techniques => query::TECHNIQUES,
            Self::Cycles => query::CYCLES,
        }
    }

    /// Techniques and cycles depend on the parameter selection and may carry
    /// options with no data behind them.
    pub fn honours_disabled(self) -> bool {
        !matches!(self, Self::Parameters)
    }
}

/// A requested change coming from a filter widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Parameters(Vec<String>),
    Techniques(Vec<String>),
    Cycles(Vec<String>),
    Days(Option<u32>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub parameters: BTreeSet<String>,
    pub techniques: BTreeSet<String>,
    pub cycles: BTreeSet<String>,
    pub days: Option<u32>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            parameters: BTreeSet::new(),
            techniques: BTreeSet::new(),
            cycles: BTreeSet::new(),
            days: Some(DEFAULT_DAY_WINDOW),
        }
    }
}

impl FilterState {
    pub fn selection(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::Parameters => &self.parameters,
            Dimension::Techniques => &self.techniques,
            Dimension::Cycles => &self.cycles,
        }
    }

    pub fn selection_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::Parameters => &mut self.parameters,
            Dimension::Techniques => &mut self.techniques,
            Dimension::Cycles => &mut self.cycles,
        }
    }

    pub fn is_selected(&self, dimension: Dimension, code: &str) -> bool {
        self.selection(dimension).contains(code)
    }

    /// Apply a widget change, keeping only codes `options` allows.
    pub fn apply(&mut self, change: FilterChange, options: &FilterOptions) {
        let (dimension, codes) = match change {
            FilterChange::Days(days) => {
                self.set_days(days);
                return;
            }
            FilterChange::Parameters(codes) => (Dimension::Parameters, codes),
            FilterChange::Techniques(codes) => (Dimension::Techniques, codes),
            FilterChange::Cycles(codes) => (Dimension::Cycles, codes),
        };
        *self.selection_mut(dimension) = codes
            .into_iter()
            .filter(|code| options.is_selectable(dimension, code))
            .collect();
    }

    /// Zero is not a valid window and means "no limit".
    pub fn set_days(&mut self, days: Option<u32>) {
        self.days = days.filter(|days| *days > 0);
    }

    pub fn select_all(&mut self, dimension: Dimension, options: &FilterOptions) {
        *self.selection_mut(dimension) = options
            .offered(dimension)
            .iter()
            .filter(|option| !(dimension.honours_disabled() && option.disabled))
            .map(|option| option.code.clone())
            .collect();
    }

    pub fn clear_all(&mut self, dimension: Dimension) {
        self.selection_mut(dimension).clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drop selections the latest option lists no longer allow. Returns
    /// whether anything was removed.
    pub fn retain_offered(&mut self, options: &FilterOptions) -> bool {
        let mut pruned = false;
        for dimension in Dimension::ALL {
            let selection = self.selection_mut(dimension);
            let before = selection.len();
            selection.retain(|code| options.is_selectable(dimension, code));
            pruned |= selection.len() != before;
        }
        pruned
    }

    fn with_codes(&self, query: Query) -> Query {
        query
            .codes(query::PARAMETERS, &self.parameters)
            .codes(query::TECHNIQUES, &self.techniques)
            .codes(query::CYCLES, &self.cycles)
    }

    /// Query for chart-data and statistics: parameters, techniques, cycles, days.
    pub fn query(&self) -> Query {
        self.with_codes(Query::new()).days(self.days)
    }

    /// Query for table-data: the filter query followed by page and page size.
    pub fn page_query(&self, page: u32, per_page: u32) -> Query {
        self.query().page(page, per_page)
    }

    /// Query for the export link: filters, format, then an enlarged page size.
    pub fn export_query(&self, format: &str, per_page: u32) -> Query {
        self.query().format(format).per_page(per_page)
    }

    /// Technique and cycle availability only depends on the parameters.
    pub fn options_query(&self) -> Query {
        Query::new().codes(query::PARAMETERS, &self.parameters)
    }

    pub fn summary(&self) -> FilterSummary {
        FilterSummary {
            parameters: self.parameters.len(),
            techniques: self.techniques.len(),
            cycles: self.cycles.len(),
        }
    }
}

/// Option lists last returned by filter-options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub parameters: Vec<FilterOption>,
    pub techniques: Vec<FilterOption>,
    pub cycles: Vec<FilterOption>,
}

impl FilterOptions {
    pub fn offered(&self, dimension: Dimension) -> &[FilterOption] {
        match dimension {
            Dimension::Parameters => &self.parameters,
            Dimension::Techniques => &self.techniques,
            Dimension::Cycles => &self.cycles,
        }
    }

    pub fn is_selectable(&self, dimension: Dimension, code: &str) -> bool {
        self.offered(dimension)
            .iter()
            .any(|option| option.code == code && !(dimension.honours_disabled() && option.disabled))
    }
}

impl From<FilterOptionsPayload> for FilterOptions {
    fn from(payload: FilterOptionsPayload) -> Self {
        Self {
            parameters: payload.parameters,
            techniques: payload.techniques,
            cycles: payload.cycles,
        }
    }
}

/// Counters shown under the filter widgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub parameters: usize,
    pub techniques: usize,
    pub cycles: usize,
}

impl FilterSummary {
    /// Rough size hint (`~10` results per parameter), `-` with no parameter.
    pub fn expected_results(&self) -> String {
        if self.parameters > 0 {
            format!("~{}", self.parameters * 10)
        } else {
            "-".to_string()
        }
    }
}
