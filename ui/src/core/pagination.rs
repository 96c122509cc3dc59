//! Results-table paging: current page plus the page-number window.

use api::Pagination;

/// Rows requested per table page.
pub const TABLE_PER_PAGE: u32 = 25;

/// Pages shown on each side of the current one.
const WINDOW_RADIUS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page: u32,
    per_page: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(TABLE_PER_PAGE)
    }
}

impl PaginationState {
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Move to `page`. Anything below 1 is rejected and leaves the state as is.
    pub fn goto(&mut self, page: i64) -> bool {
        if page < 1 {
            return false;
        }
        self.page = u32::try_from(page).unwrap_or(u32::MAX);
        true
    }
}

/// One slot of the page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Number { page: u32, active: bool },
    Ellipsis,
}

/// Page-number slots for `page` out of `total`. Empty when there is at most
/// one page.
pub fn page_window(page: u32, total: u32) -> Vec<PageSlot> {
    if total <= 1 {
        return Vec::new();
    }

    let start = page.saturating_sub(WINDOW_RADIUS).max(1);
    let end = page.saturating_add(WINDOW_RADIUS).min(total);
    let number = |n: u32| PageSlot::Number {
        page: n,
        active: n == page,
    };

    let mut slots = Vec::new();
    if start > 1 {
        slots.push(number(1));
        if start > 2 {
            slots.push(PageSlot::Ellipsis);
        }
    }
    slots.extend((start..=end).map(number));
    if end < total {
        if end + 1 < total {
            slots.push(PageSlot::Ellipsis);
        }
        slots.push(number(total));
    }
    slots
}

/// "start–end of total" caption values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeCaption {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

/// Everything the pagination strip renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationView {
    pub caption: Option<RangeCaption>,
    pub slots: Vec<PageSlot>,
    pub previous: Option<StepControl>,
    pub next: Option<StepControl>,
}

/// Previous/next arrows stay visible and are disabled at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepControl {
    pub target: i64,
    pub disabled: bool,
}

impl PaginationView {
    pub fn from_served(served: &Pagination) -> Self {
        let page = served.page.max(1);
        let per_page = u64::from(served.per_page.max(1));
        let total = served.total_count;

        let caption = (total > 0).then(|| RangeCaption {
            start: (u64::from(page) - 1) * per_page + 1,
            end: (u64::from(page) * per_page).min(total),
            total,
        });

        if served.total_pages <= 1 {
            return Self {
                caption,
                ..Self::default()
            };
        }

        Self {
            caption,
            slots: page_window(page, served.total_pages),
            previous: Some(StepControl {
                target: i64::from(page) - 1,
                disabled: page <= 1,
            }),
            next: Some(StepControl {
                target: i64::from(page) + 1,
                disabled: page >= served.total_pages,
            }),
        }
    }
}
