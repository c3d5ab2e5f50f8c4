use crate::dom::eligibility::Signals;
use crate::dom::profile::ExtractionProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Editable,
    Actionable,
    Both,
    MetadataOnly,
}

impl Classification {
    pub fn is_editable(self) -> bool {
        matches!(self, Classification::Editable | Classification::Both)
    }

    pub fn is_actionable(self) -> bool {
        matches!(self, Classification::Actionable | Classification::Both)
    }
}

/// `None` means the candidate is dropped.
pub fn classify(signals: &Signals, profile: &ExtractionProfile) -> Option<Classification> {
    match (signals.editable, signals.actionable) {
        (true, true) => Some(Classification::Both),
        (true, false) => Some(Classification::Editable),
        (false, true) => Some(Classification::Actionable),
        (false, false) if profile.admit_metadata_only && signals.has_metadata => {
            Some(Classification::MetadataOnly)
        }
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::profile::{EXTENDED, MINIMAL};

    fn signals(editable: bool, actionable: bool, has_metadata: bool) -> Signals {
        Signals {
            visible: true,
            enabled: true,
            editable,
            actionable,
            has_metadata,
            style_degraded: false,
        }
    }

    #[test]
    fn capabilities_map_to_classes() {
        assert_eq!(classify(&signals(true, true, false), &MINIMAL), Some(Classification::Both));
        assert_eq!(classify(&signals(true, false, false), &MINIMAL), Some(Classification::Editable));
        assert_eq!(classify(&signals(false, true, false), &MINIMAL), Some(Classification::Actionable));
        assert!(Classification::Both.is_editable() && Classification::Both.is_actionable());
    }

    #[test]
    fn metadata_admission_depends_on_profile() {
        let metadata_only = signals(false, false, true);
        assert_eq!(classify(&metadata_only, &MINIMAL), None);
        assert_eq!(classify(&metadata_only, &EXTENDED), Some(Classification::MetadataOnly));
        assert_eq!(classify(&signals(false, false, false), &EXTENDED), None);
    }
}
