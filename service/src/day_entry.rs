//! Per day overrides an employee records on top of the shift pattern.
//!
//! Every table holds at most one row per employee and date. Saving an empty
//! value removes the row instead of storing zeros.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::absence::AbsenceEntity;
use dao::day_note::DayNoteEntity;
use dao::manual_hours::ManualHoursEntity;
use dao::overtime::OvertimeEntity;
use dao::shift_override::ShiftOverrideEntity;
use dao::MockTransaction;
use mockall::automock;
use serde::Serialize;
use skiftplan_utils::DateRange;
use time::Date;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::rotation::ShiftType;
use crate::ServiceError;

/// Absence reasons which count as planned leave instead of absence.
pub const LEAVE_REASONS: [&str; 3] = ["Semester", "ATK", "Komp"];
pub const SICK_REASON: &str = "Sjuk";

pub fn is_leave_reason(reason: &str) -> bool {
    LEAVE_REASONS.contains(&reason)
}

/// A record which is deleted instead of stored when it carries no information.
pub trait SparseRecord {
    fn is_empty(&self) -> bool;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Absence {
    pub user_id: Uuid,
    pub date: Date,
    pub reason: Arc<str>,
    pub hours: f32,
}

impl Absence {
    pub fn is_leave(&self) -> bool {
        is_leave_reason(&self.reason)
    }

    pub fn is_sick(&self) -> bool {
        self.reason.as_ref() == SICK_REASON
    }
}

impl SparseRecord for Absence {
    fn is_empty(&self) -> bool {
        self.hours == 0.0 && self.reason.is_empty()
    }
}

impl From<&AbsenceEntity> for Absence {
    fn from(entity: &AbsenceEntity) -> Self {
        Self {
            user_id: entity.user_id,
            date: entity.date,
            reason: entity.reason.clone(),
            hours: entity.hours,
        }
    }
}

impl From<&Absence> for AbsenceEntity {
    fn from(absence: &Absence) -> Self {
        Self {
            user_id: absence.user_id,
            date: absence.date,
            reason: absence.reason.clone(),
            hours: absence.hours,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Overtime {
    pub user_id: Uuid,
    pub date: Date,
    pub mertid: f32,
    pub ot50: f32,
    pub ot100: f32,
    pub ot200: f32,
}

impl Overtime {
    pub fn has_overtime(&self) -> bool {
        self.mertid > 0.0 || self.ot50 > 0.0 || self.ot100 > 0.0 || self.ot200 > 0.0
    }
}

impl SparseRecord for Overtime {
    fn is_empty(&self) -> bool {
        self.mertid == 0.0 && self.ot50 == 0.0 && self.ot100 == 0.0 && self.ot200 == 0.0
    }
}

impl From<&OvertimeEntity> for Overtime {
    fn from(entity: &OvertimeEntity) -> Self {
        Self {
            user_id: entity.user_id,
            date: entity.date,
            mertid: entity.mertid,
            ot50: entity.ot50,
            ot100: entity.ot100,
            ot200: entity.ot200,
        }
    }
}

impl From<&Overtime> for OvertimeEntity {
    fn from(overtime: &Overtime) -> Self {
        Self {
            user_id: overtime.user_id,
            date: overtime.date,
            mertid: overtime.mertid,
            ot50: overtime.ot50,
            ot100: overtime.ot100,
            ot200: overtime.ot200,
        }
    }
}

/// Hours entered by hand which replace the computed worked hours.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ManualHours {
    pub user_id: Uuid,
    pub date: Date,
    pub hours: f32,
}

impl SparseRecord for ManualHours {
    fn is_empty(&self) -> bool {
        self.hours == 0.0
    }
}

impl From<&ManualHoursEntity> for ManualHours {
    fn from(entity: &ManualHoursEntity) -> Self {
        Self {
            user_id: entity.user_id,
            date: entity.date,
            hours: entity.hours,
        }
    }
}

impl From<&ManualHours> for ManualHoursEntity {
    fn from(manual_hours: &ManualHours) -> Self {
        Self {
            user_id: manual_hours.user_id,
            date: manual_hours.date,
            hours: manual_hours.hours,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DayNote {
    pub user_id: Uuid,
    pub date: Date,
    pub note: Arc<str>,
}

impl SparseRecord for DayNote {
    fn is_empty(&self) -> bool {
        self.note.is_empty()
    }
}

impl From<&DayNoteEntity> for DayNote {
    fn from(entity: &DayNoteEntity) -> Self {
        Self {
            user_id: entity.user_id,
            date: entity.date,
            note: entity.note.clone(),
        }
    }
}

impl From<&DayNote> for DayNoteEntity {
    fn from(day_note: &DayNote) -> Self {
        Self {
            user_id: day_note.user_id,
            date: day_note.date,
            note: day_note.note.clone(),
        }
    }
}

/// Forces a shift type on one day. `None` restores the pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShiftOverride {
    pub user_id: Uuid,
    pub date: Date,
    pub shift_type: Option<ShiftType>,
}

impl SparseRecord for ShiftOverride {
    fn is_empty(&self) -> bool {
        self.shift_type.is_none()
    }
}

impl From<&ShiftOverrideEntity> for ShiftOverride {
    fn from(entity: &ShiftOverrideEntity) -> Self {
        Self {
            user_id: entity.user_id,
            date: entity.date,
            shift_type: Some(entity.shift_type.into()),
        }
    }
}

impl TryFrom<&ShiftOverride> for ShiftOverrideEntity {
    type Error = ServiceError;

    fn try_from(shift_override: &ShiftOverride) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: shift_override.user_id,
            date: shift_override.date,
            shift_type: shift_override
                .shift_type
                .ok_or(ServiceError::InternalError)?
                .into(),
        })
    }
}

/// All records of one employee in a date range.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayEntries {
    pub absences: Arc<[Absence]>,
    pub overtime: Arc<[Overtime]>,
    pub manual_hours: Arc<[ManualHours]>,
    pub notes: Arc<[DayNote]>,
    pub shift_overrides: Arc<[ShiftOverride]>,
}

impl DayEntries {
    pub fn for_date(&self, date: Date) -> DayOverrides {
        DayOverrides {
            shift_type: self
                .shift_overrides
                .iter()
                .find(|entry| entry.date == date)
                .and_then(|entry| entry.shift_type),
            absence: self
                .absences
                .iter()
                .find(|entry| entry.date == date)
                .cloned(),
            overtime: self
                .overtime
                .iter()
                .find(|entry| entry.date == date)
                .cloned(),
            manual_hours: self
                .manual_hours
                .iter()
                .find(|entry| entry.date == date)
                .map(|entry| entry.hours),
            note: self
                .notes
                .iter()
                .find(|entry| entry.date == date)
                .map(|entry| entry.note.clone()),
        }
    }
}

/// The records which apply to a single day.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayOverrides {
    pub shift_type: Option<ShiftType>,
    pub absence: Option<Absence>,
    pub overtime: Option<Overtime>,
    pub manual_hours: Option<f32>,
    pub note: Option<Arc<str>>,
}

#[automock(type Context=(); type Transaction = MockTransaction;)]
#[async_trait]
pub trait DayEntryService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get_day_entries(
        &self,
        user_id: Uuid,
        range: DateRange,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<DayEntries, ServiceError>;

    /// Absences of every employee in the range.
    async fn get_absences_for_all(
        &self,
        range: DateRange,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Absence]>, ServiceError>;

    async fn save_absence(
        &self,
        absence: &Absence,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;

    async fn save_overtime(
        &self,
        overtime: &Overtime,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;

    async fn save_manual_hours(
        &self,
        manual_hours: &ManualHours,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;

    async fn save_note(
        &self,
        note: &DayNote,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;

    async fn save_shift_override(
        &self,
        shift_override: &ShiftOverride,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_empty_records() {
        let user_id = Uuid::nil();
        let date = date!(2024 - 01 - 01);
        assert!(Absence {
            user_id,
            date,
            reason: "".into(),
            hours: 0.0
        }
        .is_empty());
        assert!(!Absence {
            user_id,
            date,
            reason: "Sjuk".into(),
            hours: 0.0
        }
        .is_empty());
        let overtime = Overtime {
            user_id,
            date,
            mertid: 0.0,
            ot50: 0.0,
            ot100: 0.0,
            ot200: 0.0,
        };
        assert!(overtime.is_empty());
        assert!(!Overtime {
            ot200: 1.5,
            ..overtime.clone()
        }
        .is_empty());
        assert!(ShiftOverride {
            user_id,
            date,
            shift_type: None
        }
        .is_empty());
    }

    #[test]
    fn test_leave_reasons() {
        assert!(is_leave_reason("Semester"));
        assert!(is_leave_reason("ATK"));
        assert!(is_leave_reason("Komp"));
        assert!(!is_leave_reason("Sjuk"));
        assert!(!is_leave_reason("VAB"));
    }
}
