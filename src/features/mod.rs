//! Feature modals and the conversation effects they produce.
//!
//! Each modal is one variant of [`FeatureModal`] carrying its own typed form
//! payload. Submitting a modal turns into a [`FeatureAction`] that the caller
//! applies to a [`crate::conversation::ConversationEngine`].

pub mod templates;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::complaints::ComplaintRecord;
use crate::conversation::ExternalReply;
use crate::identity::SosContacts;
use crate::lawyers::LawyerQuery;

/// Caller shown by a fake call when the form leaves it blank.
pub const DEFAULT_FAKE_CALLER: &str = "Mom";

/// Default delay before a fake call rings.
pub const DEFAULT_FAKE_CALL_DELAY_SECS: u64 = 5;

/// Status given to complaints drafted through the assistant.
pub const DRAFTED_STATUS: &str = "Drafted";

/// A submitted feature modal.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum FeatureModal {
    /// Ask for legal guidance on an issue.
    LegalGuidance {
        /// Category of the issue.
        issue_type: String,
        /// Free-form description.
        details: String,
    },
    /// Draft a formal complaint.
    DraftComplaint {
        /// Kind of incident.
        incident_type: String,
        /// Date of the incident as typed by the user.
        date: String,
        /// Free-form description.
        details: String,
    },
    /// Find a lawyer.
    LawyerConnect {
        /// Requested specialization.
        specialization: String,
        /// Requested location.
        location: String,
    },
    /// Set up SOS contacts.
    SosHelp(SosContacts),
    /// Schedule a simulated incoming call.
    FakeCall {
        /// Name shown on the incoming call.
        #[serde(default = "default_fake_caller")]
        caller_name: String,
        /// Seconds before the call rings.
        #[serde(default = "default_fake_call_delay")]
        delay_secs: u64,
    },
}

fn default_fake_caller() -> String {
    DEFAULT_FAKE_CALLER.to_string()
}

const fn default_fake_call_delay() -> u64 {
    DEFAULT_FAKE_CALL_DELAY_SECS
}

/// Simulated incoming call for the client to play.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FakeCallPlan {
    /// Name shown on the incoming call.
    pub caller_name: String,
    /// Delay before ringing, in seconds.
    pub ring_after_secs: u64,
}

/// What a submitted modal does to the conversation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FeatureAction {
    /// Submit composed text as if the user typed it.
    SubmitText(String),
    /// Append a user message and the given reply.
    AppendPair {
        /// User side of the turn.
        user: String,
        /// Assistant side of the turn.
        reply: ExternalReply,
    },
    /// No conversation effect; the client plays a fake call.
    FakeCall(FakeCallPlan),
}

impl FeatureModal {
    /// Stable tag for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LegalGuidance { .. } => "legal_guidance",
            Self::DraftComplaint { .. } => "draft_complaint",
            Self::LawyerConnect { .. } => "lawyer_connect",
            Self::SosHelp(_) => "sos_help",
            Self::FakeCall { .. } => "fake_call",
        }
    }

    /// Resolve the modal into its conversation action. `today` dates complaint drafts.
    #[must_use]
    pub fn action(&self, today: NaiveDate) -> FeatureAction {
        match self {
            Self::LegalGuidance {
                issue_type,
                details,
            } => FeatureAction::SubmitText(templates::legal_guidance_request(issue_type, details)),
            Self::DraftComplaint {
                incident_type,
                date,
                details,
            } => FeatureAction::AppendPair {
                user: templates::complaint_request(incident_type, date),
                reply: ExternalReply::Ready(templates::complaint_draft(
                    incident_type,
                    date,
                    details,
                    today,
                )),
            },
            Self::LawyerConnect {
                specialization,
                location,
            } => FeatureAction::AppendPair {
                user: templates::lawyer_request(specialization, location),
                reply: ExternalReply::LawyerLookup(LawyerQuery::new(
                    specialization.as_str(),
                    location.as_str(),
                )),
            },
            Self::SosHelp(contacts) => FeatureAction::AppendPair {
                user: templates::SOS_REQUEST.to_string(),
                reply: ExternalReply::Ready(templates::sos_confirmation(contacts)),
            },
            Self::FakeCall {
                caller_name,
                delay_secs,
            } => {
                let caller_name = if caller_name.trim().is_empty() {
                    default_fake_caller()
                } else {
                    caller_name.clone()
                };
                FeatureAction::FakeCall(FakeCallPlan {
                    caller_name,
                    ring_after_secs: *delay_secs,
                })
            }
        }
    }

    /// Complaint record to attribute to the signed-in user, for complaint drafts.
    #[must_use]
    pub fn complaint_record(&self, today: NaiveDate) -> Option<ComplaintRecord> {
        let Self::DraftComplaint {
            incident_type,
            date,
            details,
        } = self
        else {
            return None;
        };

        let date = if date.trim().is_empty() {
            today.format("%Y-%m-%d").to_string()
        } else {
            date.clone()
        };
        Some(ComplaintRecord::new(
            format!("{incident_type} incident"),
            details.clone(),
            DRAFTED_STATUS,
            date,
        ))
    }

    /// SOS contacts to save for the signed-in user, for SOS setup.
    #[must_use]
    pub const fn sos_contacts(&self) -> Option<&SosContacts> {
        match self {
            Self::SosHelp(contacts) => Some(contacts),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 2).expect("valid date")
    }

    #[test]
    fn test_deserialize_tagged_payloads() {
        let modal: FeatureModal = serde_json::from_str(
            r#"{"kind":"lawyer_connect","specialization":"harassment","location":"pune"}"#,
        )
        .expect("lawyer payload");
        assert_eq!(modal.kind(), "lawyer_connect");

        let modal: FeatureModal = serde_json::from_str(
            r#"{"kind":"draft_complaint","incidentType":"stalking","date":"2025-04-30","details":"x"}"#,
        )
        .expect("complaint payload");
        assert_eq!(modal.kind(), "draft_complaint");

        let modal: FeatureModal = serde_json::from_str(
            r#"{"kind":"sos_help","contact1Name":"A","contact1Phone":"1","contact2Name":"B","contact2Phone":"2","message":"m"}"#,
        )
        .expect("sos payload");
        assert!(modal.sos_contacts().is_some());

        let modal: FeatureModal =
            serde_json::from_str(r#"{"kind":"fake_call"}"#).expect("fake call payload");
        assert_eq!(
            modal.action(today()),
            FeatureAction::FakeCall(FakeCallPlan {
                caller_name: DEFAULT_FAKE_CALLER.to_string(),
                ring_after_secs: DEFAULT_FAKE_CALL_DELAY_SECS,
            })
        );

        assert!(serde_json::from_str::<FeatureModal>(r#"{"kind":"unknown"}"#).is_err());
    }

    #[test]
    fn test_legal_guidance_is_submitted_as_text() {
        let modal = FeatureModal::LegalGuidance {
            issue_type: "divorce".to_string(),
            details: "custody".to_string(),
        };
        assert_eq!(
            modal.action(today()),
            FeatureAction::SubmitText(
                "I need legal guidance regarding divorce. Details: custody".to_string()
            )
        );
    }

    #[test]
    fn test_lawyer_connect_needs_lookup() {
        let modal = FeatureModal::LawyerConnect {
            specialization: "harassment".to_string(),
            location: "pune".to_string(),
        };
        let FeatureAction::AppendPair { user, reply } = modal.action(today()) else {
            unreachable!("lawyer connect appends a pair");
        };
        assert!(user.contains("harassment in pune"));
        assert_eq!(
            reply,
            ExternalReply::LawyerLookup(LawyerQuery::new("harassment", "pune"))
        );
    }

    #[test]
    fn test_complaint_record_only_for_drafts() {
        let draft = FeatureModal::DraftComplaint {
            incident_type: "stalking".to_string(),
            date: "2025-04-30".to_string(),
            details: "followed home".to_string(),
        };
        let record = draft.complaint_record(today()).expect("draft produces a record");
        assert_eq!(record.title, "stalking incident");
        assert_eq!(record.date, "2025-04-30");
        assert_eq!(record.status, DRAFTED_STATUS);

        let call = FeatureModal::FakeCall {
            caller_name: String::new(),
            delay_secs: 1,
        };
        assert!(call.complaint_record(today()).is_none());
        assert!(call.sos_contacts().is_none());
    }
}
