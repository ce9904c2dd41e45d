use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    absence::{AbsenceDao, AbsenceEntity},
    day_note::{DayNoteDao, DayNoteEntity},
    manual_hours::{ManualHoursDao, ManualHoursEntity},
    overtime::{OvertimeDao, OvertimeEntity},
    shift_override::{ShiftOverrideDao, ShiftOverrideEntity},
    TransactionDao,
};
use service::{
    day_entry::{
        Absence, DayEntries, DayEntryService, DayNote, ManualHours, Overtime, ShiftOverride,
        SparseRecord,
    },
    employee::EmployeeService,
    permission::{Authentication, ADMIN_PRIVILEGE, CONTROLLER_PRIVILEGE},
    PermissionService, ServiceError, ValidationFailureItem,
};
use skiftplan_utils::DateRange;
use tokio::join;
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct DayEntryServiceImpl: DayEntryService = DayEntryServiceDeps {
        AbsenceDao: AbsenceDao<Transaction = Self::Transaction> = absence_dao,
        OvertimeDao: OvertimeDao<Transaction = Self::Transaction> = overtime_dao,
        ManualHoursDao: ManualHoursDao<Transaction = Self::Transaction> = manual_hours_dao,
        DayNoteDao: DayNoteDao<Transaction = Self::Transaction> = day_note_dao,
        ShiftOverrideDao: ShiftOverrideDao<Transaction = Self::Transaction> = shift_override_dao,
        EmployeeService: EmployeeService<Context = Self::Context, Transaction = Self::Transaction> = employee_service,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const DAY_ENTRY_SERVICE_PROCESS: &str = "day-entry-service";

fn validate_hours(values: &[(&str, f32)]) -> Result<(), ServiceError> {
    let failures: Vec<ValidationFailureItem> = values
        .iter()
        .filter(|(_, hours)| !hours.is_finite() || *hours < 0.0)
        .map(|(field, _)| ValidationFailureItem::InvalidValue((*field).into()))
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(failures.into()))
    }
}

impl<Deps: DayEntryServiceDeps> DayEntryServiceImpl<Deps> {
    /// Only the employee or an administrator may change a day.
    async fn check_write_access(
        &self,
        user_id: Uuid,
        context: Authentication<Deps::Context>,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        let (admin, own) = join!(
            self.permission_service.check_permission(
                ADMIN_PRIVILEGE,
                context.clone(),
                tx.clone().into()
            ),
            self.permission_service.check_user(user_id, context),
        );
        admin.or(own)?;
        self.employee_service
            .verify_user_is_employee(user_id, Authentication::Full, tx.into())
            .await
    }
}

#[async_trait]
impl<Deps: DayEntryServiceDeps> DayEntryService for DayEntryServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_day_entries(
        &self,
        user_id: Uuid,
        range: DateRange,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<DayEntries, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let (controller, own) = join!(
            self.permission_service.check_permission(
                CONTROLLER_PRIVILEGE,
                context.clone(),
                tx.clone().into()
            ),
            self.permission_service.check_user(user_id, context.clone()),
        );
        controller.or(own)?;

        let (from, to) = (range.from(), range.to());
        let absences = self
            .absence_dao
            .find_by_user_and_range(user_id, from, to, tx.clone())
            .await?
            .iter()
            .map(Absence::from)
            .collect();
        let overtime = self
            .overtime_dao
            .find_by_user_and_range(user_id, from, to, tx.clone())
            .await?
            .iter()
            .map(Overtime::from)
            .collect();
        let manual_hours = self
            .manual_hours_dao
            .find_by_user_and_range(user_id, from, to, tx.clone())
            .await?
            .iter()
            .map(ManualHours::from)
            .collect();
        let notes = self
            .day_note_dao
            .find_by_user_and_range(user_id, from, to, tx.clone())
            .await?
            .iter()
            .map(DayNote::from)
            .collect();
        let shift_overrides = self
            .shift_override_dao
            .find_by_user_and_range(user_id, from, to, tx.clone())
            .await?
            .iter()
            .map(ShiftOverride::from)
            .collect();

        self.transaction_dao.commit(tx).await?;
        Ok(DayEntries {
            absences,
            overtime,
            manual_hours,
            notes,
            shift_overrides,
        })
    }

    async fn get_absences_for_all(
        &self,
        range: DateRange,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Absence]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(CONTROLLER_PRIVILEGE, context, tx.clone().into())
            .await?;
        let absences = self
            .absence_dao
            .find_by_range(range.from(), range.to(), tx.clone())
            .await?
            .iter()
            .map(Absence::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(absences)
    }

    async fn save_absence(
        &self,
        absence: &Absence,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_write_access(absence.user_id, context, tx.clone())
            .await?;
        validate_hours(&[("hours", absence.hours)])?;

        if absence.is_empty() {
            self.absence_dao
                .delete(
                    absence.user_id,
                    absence.date,
                    DAY_ENTRY_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
        } else {
            self.absence_dao
                .upsert(
                    &AbsenceEntity::from(absence),
                    DAY_ENTRY_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
        }
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }

    async fn save_overtime(
        &self,
        overtime: &Overtime,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_write_access(overtime.user_id, context, tx.clone())
            .await?;
        validate_hours(&[
            ("mertid", overtime.mertid),
            ("ot50", overtime.ot50),
            ("ot100", overtime.ot100),
            ("ot200", overtime.ot200),
        ])?;

        if overtime.is_empty() {
            self.overtime_dao
                .delete(
                    overtime.user_id,
                    overtime.date,
                    DAY_ENTRY_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
        } else {
            self.overtime_dao
                .upsert(
                    &OvertimeEntity::from(overtime),
                    DAY_ENTRY_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
        }
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }

    async fn save_manual_hours(
        &self,
        manual_hours: &ManualHours,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_write_access(manual_hours.user_id, context, tx.clone())
            .await?;
        validate_hours(&[("hours", manual_hours.hours)])?;

        if manual_hours.is_empty() {
            self.manual_hours_dao
                .delete(
                    manual_hours.user_id,
                    manual_hours.date,
                    DAY_ENTRY_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
        } else {
            self.manual_hours_dao
                .upsert(
                    &ManualHoursEntity::from(manual_hours),
                    DAY_ENTRY_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
        }
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }

    async fn save_note(
        &self,
        note: &DayNote,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_write_access(note.user_id, context, tx.clone())
            .await?;

        if note.is_empty() {
            self.day_note_dao
                .delete(
                    note.user_id,
                    note.date,
                    DAY_ENTRY_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
        } else {
            self.day_note_dao
                .upsert(
                    &DayNoteEntity::from(note),
                    DAY_ENTRY_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
        }
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }

    async fn save_shift_override(
        &self,
        shift_override: &ShiftOverride,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_write_access(shift_override.user_id, context, tx.clone())
            .await?;

        if shift_override.is_empty() {
            self.shift_override_dao
                .delete(
                    shift_override.user_id,
                    shift_override.date,
                    DAY_ENTRY_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
        } else {
            self.shift_override_dao
                .upsert(
                    &ShiftOverrideEntity::try_from(shift_override)?,
                    DAY_ENTRY_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
        }
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}
