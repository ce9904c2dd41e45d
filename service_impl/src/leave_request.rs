use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    leave_request::{LeaveRequestDao, LeaveRequestEntity},
    TransactionDao,
};
use service::{
    clock::ClockService,
    config::ConfigService,
    day_entry::{Absence, DayEntryService},
    employee::EmployeeService,
    leave::{
        LeaveRequest, LeaveRequestOverview, LeaveRequestService, LeaveSpan, LeaveStatus,
        LeaveType,
    },
    permission::{Authentication, ADMIN_PRIVILEGE, CONTROLLER_PRIVILEGE},
    rotation::RotationTable,
    settings::SettingsService,
    uuid_service::UuidService,
    PermissionService, ServiceError,
};
use skiftplan_utils::DateRange;
use time::Date;
use tokio::join;
use tracing::instrument;
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct LeaveRequestServiceImpl: LeaveRequestService = LeaveRequestServiceDeps {
        LeaveRequestDao: LeaveRequestDao<Transaction = Self::Transaction> = leave_request_dao,
        DayEntryService: DayEntryService<Context = Self::Context, Transaction = Self::Transaction> = day_entry_service,
        EmployeeService: EmployeeService<Context = Self::Context, Transaction = Self::Transaction> = employee_service,
        SettingsService: SettingsService<Context = Self::Context, Transaction = Self::Transaction> = settings_service,
        ConfigService: ConfigService = config_service,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const LEAVE_REQUEST_SERVICE_PROCESS: &str = "leave-request-service";

impl<Deps: LeaveRequestServiceDeps> LeaveRequestServiceImpl<Deps> {
    async fn check_owner_or(
        &self,
        user_id: Uuid,
        privilege: &str,
        context: Authentication<Deps::Context>,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        let (privileged, own) = join!(
            self.permission_service
                .check_permission(privilege, context.clone(), tx.into()),
            self.permission_service.check_user(user_id, context),
        );
        privileged.or(own)
    }

    /// Days in the range on which the pattern plans hours, with their hours.
    async fn working_days(
        &self,
        user_id: Uuid,
        from: Date,
        to: Date,
        tx: Deps::Transaction,
    ) -> Result<Vec<(Date, f32)>, ServiceError> {
        let range = DateRange::new(from, to)?;
        let employee = self
            .employee_service
            .get(user_id, Authentication::Full, tx.clone().into())
            .await?;
        let settings = self
            .settings_service
            .get_settings(Authentication::Full, tx.into())
            .await?;
        let table = RotationTable::new(self.config_service.get_config().await?.rotation_variant);
        Ok(range
            .iter()
            .map(|date| (date, table.nominal_hours(employee.team, date, &settings)))
            .filter(|(_, hours)| *hours > 0.0)
            .collect())
    }

    async fn find_request(
        &self,
        request_id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<LeaveRequest, ServiceError> {
        self.leave_request_dao
            .find_by_id(request_id, tx)
            .await?
            .as_ref()
            .map(LeaveRequest::from)
            .ok_or(ServiceError::EntityNotFound(request_id))
    }

    async fn store(
        &self,
        request: &LeaveRequest,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        self.leave_request_dao
            .update(
                &LeaveRequestEntity::from(request),
                LEAVE_REQUEST_SERVICE_PROCESS,
                tx,
            )
            .await?;
        Ok(())
    }
}

fn span_of(working_days: &[(Date, f32)]) -> LeaveSpan {
    LeaveSpan {
        days: working_days.len() as u32,
        hours: working_days.iter().map(|(_, hours)| hours).sum(),
    }
}

#[async_trait]
impl<Deps: LeaveRequestServiceDeps> LeaveRequestService for LeaveRequestServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn calculate_span(
        &self,
        user_id: Uuid,
        from: Date,
        to: Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveSpan, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_owner_or(user_id, ADMIN_PRIVILEGE, context, tx.clone())
            .await?;
        let span = span_of(&self.working_days(user_id, from, to, tx.clone()).await?);
        self.transaction_dao.commit(tx).await?;
        Ok(span)
    }

    #[instrument(skip(self))]
    async fn submit(
        &self,
        user_id: Uuid,
        leave_type: LeaveType,
        from: Date,
        to: Date,
        comment: Option<Arc<str>>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_owner_or(user_id, ADMIN_PRIVILEGE, context, tx.clone())
            .await?;
        let span = span_of(&self.working_days(user_id, from, to, tx.clone()).await?);
        if span.days == 0 {
            return Err(ServiceError::NoWorkingDaysInRange(from, to));
        }

        let request = LeaveRequest {
            id: self.uuid_service.new_uuid("leave-request-id"),
            user_id,
            leave_type,
            date_from: from,
            date_to: to,
            days: span.days,
            hours: span.hours,
            status: LeaveStatus::Pending,
            comment: comment
                .map(|comment| Arc::<str>::from(comment.trim()))
                .filter(|comment| !comment.is_empty()),
            deny_reason: None,
            created: self.clock_service.date_time_now(),
            decided_by: None,
            decided_at: None,
        };
        self.leave_request_dao
            .create(
                &LeaveRequestEntity::from(&request),
                LEAVE_REQUEST_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(request)
    }

    #[instrument(skip(self))]
    async fn approve(
        &self,
        request_id: Uuid,
        admin_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context, tx.clone().into())
            .await?;
        let request = self.find_request(request_id, tx.clone()).await?;
        if !request.status.is_pending() {
            tracing::warn!(
                %request_id,
                status = ?request.status,
                "Leave request already decided"
            );
            return Err(ServiceError::LeaveRequestNotPending(request_id));
        }
        self.employee_service
            .verify_user_is_employee(admin_id, Authentication::Full, tx.clone().into())
            .await?;

        let request = LeaveRequest {
            status: LeaveStatus::Approved,
            decided_by: Some(admin_id),
            decided_at: Some(self.clock_service.date_time_now()),
            ..request
        };
        self.store(&request, tx.clone()).await?;
        tracing::info!(%request_id, %admin_id, "Leave request approved");

        let reason: Arc<str> = request.leave_type.as_str().into();
        for (date, hours) in self
            .working_days(request.user_id, request.date_from, request.date_to, tx.clone())
            .await?
        {
            self.day_entry_service
                .save_absence(
                    &Absence {
                        user_id: request.user_id,
                        date,
                        reason: reason.clone(),
                        hours,
                    },
                    Authentication::Full,
                    tx.clone().into(),
                )
                .await?;
        }
        self.transaction_dao.commit(tx).await?;
        Ok(request)
    }

    async fn deny(
        &self,
        request_id: Uuid,
        admin_id: Uuid,
        reason: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context, tx.clone().into())
            .await?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ServiceError::missing_value("reason"));
        }
        let request = self.find_request(request_id, tx.clone()).await?;
        if !request.status.is_pending() {
            tracing::warn!(
                %request_id,
                status = ?request.status,
                "Leave request already decided"
            );
            return Err(ServiceError::LeaveRequestNotPending(request_id));
        }
        self.employee_service
            .verify_user_is_employee(admin_id, Authentication::Full, tx.clone().into())
            .await?;

        let request = LeaveRequest {
            status: LeaveStatus::Denied,
            deny_reason: Some(reason.into()),
            decided_by: Some(admin_id),
            decided_at: Some(self.clock_service.date_time_now()),
            ..request
        };
        self.store(&request, tx.clone()).await?;
        tracing::info!(%request_id, %admin_id, "Leave request denied");
        self.transaction_dao.commit(tx).await?;
        Ok(request)
    }

    async fn cancel(
        &self,
        request_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let request = self.find_request(request_id, tx.clone()).await?;
        self.check_owner_or(request.user_id, ADMIN_PRIVILEGE, context, tx.clone())
            .await?;
        if !request.status.is_pending() {
            self.transaction_dao.commit(tx).await?;
            return Ok(request);
        }

        let request = LeaveRequest {
            status: LeaveStatus::Cancelled,
            ..request
        };
        self.store(&request, tx.clone()).await?;
        tracing::info!(%request_id, "Leave request cancelled");
        self.transaction_dao.commit(tx).await?;
        Ok(request)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[LeaveRequest]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_owner_or(user_id, CONTROLLER_PRIVILEGE, context, tx.clone())
            .await?;
        let requests = self
            .leave_request_dao
            .find_active_by_user(user_id, tx.clone())
            .await?
            .iter()
            .map(LeaveRequest::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(requests)
    }

    async fn list_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[LeaveRequestOverview]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(CONTROLLER_PRIVILEGE, context, tx.clone().into())
            .await?;
        let employees = self
            .employee_service
            .get_all(Authentication::Full, tx.clone().into())
            .await?;
        let overviews = self
            .leave_request_dao
            .find_all_active(tx.clone())
            .await?
            .iter()
            .filter_map(|entity| {
                let employee = employees
                    .iter()
                    .find(|employee| employee.id == entity.user_id)?;
                Some(LeaveRequestOverview {
                    request: LeaveRequest::from(entity),
                    name: employee.name.clone(),
                    team: employee.team,
                })
            })
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(overviews)
    }
}
