//! The single visible detail overlay.
//!
//! Despite the name this is not a stack: at most one overlay exists and
//! opening another one replaces it, dropping whatever state it held.

use crate::types::{HourActivityRecord, HourBucket, UserDetail};

/// Fetch state of the records inside an hour drill-down.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityLoad {
    Loading,
    /// Records for the hour; failures also land here, as an empty list
    Ready(Vec<HourActivityRecord>),
}

/// Contents of the hour drill-down overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct HourDrillDown {
    /// Chart label as shown, `"YYYY-MM-DD HH:00"`
    pub label: String,
    pub bucket: HourBucket,
    pub video_title: String,
    pub activity: ActivityLoad,
}

impl HourDrillDown {
    pub fn is_loading(&self) -> bool {
        matches!(self.activity, ActivityLoad::Loading)
    }

    /// Records fetched so far (empty while loading).
    pub fn records(&self) -> &[HourActivityRecord] {
        match &self.activity {
            ActivityLoad::Loading => &[],
            ActivityLoad::Ready(records) => records,
        }
    }

    /// Loaded and nothing happened in that hour.
    pub fn is_empty_result(&self) -> bool {
        matches!(&self.activity, ActivityLoad::Ready(records) if records.is_empty())
    }
}

/// Which overlay is showing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Overlay {
    #[default]
    Closed,
    AccountDetail(Box<UserDetail>),
    HourDrillDown(HourDrillDown),
    About,
}

/// Where a pointer click landed relative to the open overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the overlay
    Scrim,
    /// Inside the overlay's content box
    Content,
}

/// Holds the active overlay and its transitions.
#[derive(Debug, Default)]
pub struct ModalStack {
    overlay: Overlay,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.overlay, Overlay::Closed)
    }

    pub fn hour(&self) -> Option<&HourDrillDown> {
        match &self.overlay {
            Overlay::HourDrillDown(hour) => Some(hour),
            _ => None,
        }
    }

    /// Show `overlay`, returning the one it replaced.
    fn open(&mut self, overlay: Overlay) -> Overlay {
        std::mem::replace(&mut self.overlay, overlay)
    }

    pub fn open_account(&mut self, detail: UserDetail) -> Overlay {
        self.open(Overlay::AccountDetail(Box::new(detail)))
    }

    pub fn open_hour(&mut self, label: String, bucket: HourBucket, video_title: String) -> Overlay {
        self.open(Overlay::HourDrillDown(HourDrillDown {
            label,
            bucket,
            video_title,
            activity: ActivityLoad::Loading,
        }))
    }

    pub fn open_about(&mut self) -> Overlay {
        self.open(Overlay::About)
    }

    /// Close whatever is open, returning it.
    pub fn close(&mut self) -> Overlay {
        self.open(Overlay::Closed)
    }

    /// Route a click. Only the scrim closes; content clicks are swallowed.
    ///
    /// Returns the closed overlay when the click closed one.
    pub fn click(&mut self, target: ClickTarget) -> Option<Overlay> {
        match target {
            ClickTarget::Scrim if self.is_open() => Some(self.close()),
            _ => None,
        }
    }

    /// Fill the open hour drill-down with its records.
    ///
    /// Returns false when no hour overlay is open any more.
    pub fn set_activity(&mut self, records: Vec<HourActivityRecord>) -> bool {
        match &mut self.overlay {
            Overlay::HourDrillDown(hour) => {
                hour.activity = ActivityLoad::Ready(records);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> HourActivityRecord {
        HourActivityRecord {
            username: name.to_string(),
            risk_label: "Fresh Account".to_string(),
            timestamp: "2025-12-06T14:05:00".to_string(),
            is_bot: true,
            created_at: None,
        }
    }

    fn detail(name: &str) -> UserDetail {
        serde_json::from_value(serde_json::json!({ "username": name })).unwrap()
    }

    fn open_hour(modal: &mut ModalStack) {
        modal.open_hour(
            "2025-12-06 14:00".to_string(),
            HourBucket::from_label("2025-12-06 14:00"),
            "Video 20".to_string(),
        );
    }

    #[test]
    fn test_starts_closed() {
        let modal = ModalStack::new();
        assert_eq!(modal.overlay(), &Overlay::Closed);
        assert!(!modal.is_open());
    }

    #[test]
    fn test_hour_loading_then_ready() {
        let mut modal = ModalStack::new();
        open_hour(&mut modal);
        assert!(modal.hour().unwrap().is_loading());
        assert!(!modal.hour().unwrap().is_empty_result());

        assert!(modal.set_activity(vec![]));
        let hour = modal.hour().unwrap();
        assert!(!hour.is_loading());
        assert!(hour.is_empty_result());
    }

    #[test]
    fn test_account_replaces_hour_and_discards_activity() {
        let mut modal = ModalStack::new();
        open_hour(&mut modal);
        modal.set_activity(vec![record("user_1")]);

        let previous = modal.open_account(detail("user_1"));
        assert!(matches!(previous, Overlay::HourDrillDown(_)));
        assert!(matches!(modal.overlay(), Overlay::AccountDetail(_)));
        assert!(modal.hour().is_none());

        // A late activity response has nowhere to go.
        assert!(!modal.set_activity(vec![record("user_2")]));
    }

    #[test]
    fn test_scrim_click_closes_content_click_does_not() {
        let mut modal = ModalStack::new();
        modal.open_about();

        assert_eq!(modal.click(ClickTarget::Content), None);
        assert_eq!(modal.overlay(), &Overlay::About);

        assert_eq!(modal.click(ClickTarget::Scrim), Some(Overlay::About));
        assert!(!modal.is_open());
        assert_eq!(modal.click(ClickTarget::Scrim), None);
    }

    #[test]
    fn test_close_returns_previous() {
        let mut modal = ModalStack::new();
        open_hour(&mut modal);
        assert!(matches!(modal.close(), Overlay::HourDrillDown(_)));
        assert_eq!(modal.close(), Overlay::Closed);
    }
}
