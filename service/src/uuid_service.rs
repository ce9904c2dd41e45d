use mockall::automock;
use uuid::Uuid;

#[automock]
pub trait UuidService {
    /// `usage` names the record the id is generated for, e.g. "ReportService::save_report id".
    fn new_uuid(&self, usage: &str) -> Uuid;
}
