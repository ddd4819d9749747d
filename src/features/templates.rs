//! Message templates for feature modals.

use chrono::NaiveDate;

use crate::identity::SosContacts;

/// User line for a legal-guidance request; submitted as ordinary user text.
#[must_use]
pub fn legal_guidance_request(issue_type: &str, details: &str) -> String {
    format!("I need legal guidance regarding {issue_type}. Details: {details}")
}

/// User line for a complaint draft request.
#[must_use]
pub fn complaint_request(incident_type: &str, date: &str) -> String {
    format!("I need help drafting a complaint about {incident_type} that occurred on {date}.")
}

/// Assistant reply carrying the formal complaint draft, dated `today`.
#[must_use]
pub fn complaint_draft(incident_type: &str, date: &str, details: &str, today: NaiveDate) -> String {
    format!(
        "I've prepared a draft complaint based on the information you provided about the {incident_type} incident on {date}. Here's the draft:\n\n\
         [FORMAL COMPLAINT]\n\
         Date: {today}\n\
         Re: {incident_type} Incident on {date}\n\n\
         To Whom It May Concern,\n\n\
         I am writing to formally report an incident of {incident_type} that occurred on {date}. {details}\n\n\
         I request that this matter be investigated promptly and appropriate action be taken.\n\n\
         Sincerely,\n\
         [Your Name]\n\n\
         You can copy this draft and modify it as needed. Would you like me to help you with any specific sections of the complaint?",
        today = today.format("%Y-%m-%d"),
    )
}

/// User line for a lawyer-connect request.
#[must_use]
pub fn lawyer_request(specialization: &str, location: &str) -> String {
    format!("I need to connect with a lawyer who specializes in {specialization} in {location}.")
}

/// User line for SOS setup.
pub const SOS_REQUEST: &str = "I need to set up my SOS emergency contacts.";

/// Assistant confirmation for saved SOS contacts.
#[must_use]
pub fn sos_confirmation(contacts: &SosContacts) -> String {
    format!(
        "I've set up your emergency contacts. In case of an emergency, click the SOS button and a message with your location will be sent to:\n\n\
         1. {}: {}\n\
         2. {}: {}\n\n\
         Your emergency message: \"{}\"\n\n\
         You can update these contacts at any time from your profile settings.",
        contacts.contact1_name,
        contacts.contact1_phone,
        contacts.contact2_name,
        contacts.contact2_phone,
        contacts.message,
    )
}
