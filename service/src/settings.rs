use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::settings::{SettingsEntity, TeamSettingEntity};
use dao::MockTransaction;
use mockall::automock;
use serde::Serialize;
use skiftplan_utils::derive_from_reference;
use time::{Date, Duration};

use crate::calendar::first_monday_of_year;
use crate::permission::Authentication;
use crate::rotation::Team;
use crate::ServiceError;

pub fn default_team_name(team: Team) -> &'static str {
    match team {
        Team::A => "Skiftlag 1",
        Team::B => "Skiftlag 2",
        Team::C => "Skiftlag 3",
        Team::D => "Dagtid",
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TeamSetting {
    pub team: Team,
    pub anchor_date: Option<Date>,
    pub name: Arc<str>,
}

impl From<&TeamSettingEntity> for TeamSetting {
    fn from(entity: &TeamSettingEntity) -> Self {
        Self {
            team: entity.team.into(),
            anchor_date: entity.anchor_date,
            name: entity.name.clone(),
        }
    }
}

impl From<&TeamSetting> for TeamSettingEntity {
    fn from(team_setting: &TeamSetting) -> Self {
        Self {
            team: team_setting.team.into(),
            anchor_date: team_setting.anchor_date,
            name: team_setting.name.clone(),
        }
    }
}

/// Rotation configuration: global start date plus per team anchor and display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub start_date: Date,
    pub teams: Arc<[TeamSetting]>,
}

impl Settings {
    /// A starts on `start_date`, B one week later and C two weeks later.
    pub fn with_start_date(start_date: Date) -> Self {
        let anchor = |team: Team| match team {
            Team::A => Some(start_date),
            Team::B => Some(start_date + Duration::days(7)),
            Team::C => Some(start_date + Duration::days(14)),
            Team::D => None,
        };
        Self {
            start_date,
            teams: Team::ALL
                .iter()
                .map(|team| TeamSetting {
                    team: *team,
                    anchor_date: anchor(*team),
                    name: default_team_name(*team).into(),
                })
                .collect(),
        }
    }

    /// Defaults used until an administrator saves the rotation.
    pub fn defaults_for_year(year: i32) -> Result<Self, ServiceError> {
        let start_date = first_monday_of_year(year).ok_or(ServiceError::InternalError)?;
        Ok(Self::with_start_date(start_date))
    }

    fn team(&self, team: Team) -> Option<&TeamSetting> {
        self.teams.iter().find(|setting| setting.team == team)
    }

    /// Anchor of a team's cycle. Falls back to the global start date.
    pub fn anchor(&self, team: Team) -> Date {
        self.team(team)
            .and_then(|setting| setting.anchor_date)
            .unwrap_or(self.start_date)
    }

    pub fn team_name(&self, team: Team) -> Arc<str> {
        self.team(team)
            .map(|setting| setting.name.clone())
            .unwrap_or_else(|| default_team_name(team).into())
    }
}

impl From<&SettingsEntity> for Settings {
    fn from(entity: &SettingsEntity) -> Self {
        Self {
            start_date: entity.start_date,
            teams: entity.teams.iter().map(TeamSetting::from).collect(),
        }
    }
}
derive_from_reference!(SettingsEntity, Settings);

impl From<&Settings> for SettingsEntity {
    fn from(settings: &Settings) -> Self {
        Self {
            start_date: settings.start_date,
            teams: settings.teams.iter().map(TeamSettingEntity::from).collect(),
        }
    }
}

#[automock(type Context=(); type Transaction = MockTransaction;)]
#[async_trait]
pub trait SettingsService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get_settings(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Settings, ServiceError>;

    async fn save_settings(
        &self,
        settings: &Settings,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Settings, ServiceError>;
}
