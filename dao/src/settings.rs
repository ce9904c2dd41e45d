use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::employee::TeamEntity;
use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamSettingEntity {
    pub team: TeamEntity,
    pub anchor_date: Option<time::Date>,
    pub name: Arc<str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEntity {
    pub start_date: time::Date,
    pub teams: Arc<[TeamSettingEntity]>,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait SettingsDao {
    type Transaction: crate::Transaction;

    /// Returns `None` as long as the rotation was never configured.
    async fn find(&self, tx: Self::Transaction) -> Result<Option<SettingsEntity>, DaoError>;
    async fn save(
        &self,
        entity: &SettingsEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
