mod leads;

pub use leads::{Lead, LeadStore, MongoLeadStore, NewLead, StoredLead, LEAD_SOURCE};
