use async_trait::async_trait;
use dao::{
    settings::{SettingsDao, SettingsEntity},
    TransactionDao,
};
use service::{
    clock::ClockService,
    permission::{Authentication, ADMIN_PRIVILEGE},
    settings::{Settings, SettingsService},
    PermissionService, ServiceError,
};

use crate::gen_service_impl;

gen_service_impl! {
    struct SettingsServiceImpl: SettingsService = SettingsServiceDeps {
        SettingsDao: SettingsDao<Transaction = Self::Transaction> = settings_dao,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        ClockService: ClockService = clock_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const SETTINGS_SERVICE_PROCESS: &str = "settings-service";

#[async_trait]
impl<Deps: SettingsServiceDeps> SettingsService for SettingsServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_settings(
        &self,
        _context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Settings, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let settings = match self.settings_dao.find(tx.clone()).await? {
            Some(entity) => Settings::from(&entity),
            None => {
                // Stored on first use so the anchor does not move with the year.
                let defaults = Settings::defaults_for_year(self.clock_service.date_now().year())?;
                self.settings_dao
                    .save(
                        &SettingsEntity::from(&defaults),
                        SETTINGS_SERVICE_PROCESS,
                        tx.clone(),
                    )
                    .await?;
                tracing::info!(start_date = %defaults.start_date, "Stored default settings");
                defaults
            }
        };
        self.transaction_dao.commit(tx).await?;
        Ok(settings)
    }

    async fn save_settings(
        &self,
        settings: &Settings,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Settings, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context, tx.clone().into())
            .await?;

        if settings.teams.iter().any(|team| team.name.trim().is_empty()) {
            return Err(ServiceError::missing_value("name"));
        }

        self.settings_dao
            .save(
                &SettingsEntity::from(settings),
                SETTINGS_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(settings.clone())
    }
}
