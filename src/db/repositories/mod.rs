mod clinical_sessions;
mod rates;
mod staff;
mod summary;
