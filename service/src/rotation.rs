//! Shift pattern of the rotating teams.
//!
//! Teams A, B and C follow a three week cycle anchored on a per team date.
//! Team D works day shifts Monday to Friday.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use dao::employee::TeamEntity;
use dao::shift_override::ShiftTypeEntity;
use serde::Serialize;
use skiftplan_utils::derive_from_reference;
use time::{Date, Weekday};

use crate::settings::Settings;
use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Team {
    A,
    B,
    C,
    D,
}

impl Team {
    pub const ALL: [Team; 4] = [Team::A, Team::B, Team::C, Team::D];

    pub fn is_rotating(&self) -> bool {
        !matches!(self, Team::D)
    }

    /// Nominal length of one shift.
    pub fn full_day_hours(&self) -> f32 {
        match self {
            Team::D => 8.0,
            _ => 12.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::A => "A",
            Team::B => "B",
            Team::C => "C",
            Team::D => "D",
        }
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "A" => Ok(Team::A),
            "B" => Ok(Team::B),
            "C" => Ok(Team::C),
            "D" => Ok(Team::D),
            _ => Err(ServiceError::invalid_value("team")),
        }
    }
}

impl From<&TeamEntity> for Team {
    fn from(team: &TeamEntity) -> Self {
        match team {
            TeamEntity::A => Self::A,
            TeamEntity::B => Self::B,
            TeamEntity::C => Self::C,
            TeamEntity::D => Self::D,
        }
    }
}
derive_from_reference!(TeamEntity, Team);

impl From<&Team> for TeamEntity {
    fn from(team: &Team) -> Self {
        match team {
            Team::A => Self::A,
            Team::B => Self::B,
            Team::C => Self::C,
            Team::D => Self::D,
        }
    }
}
derive_from_reference!(Team, TeamEntity);

/// Shift type which can be forced on a single day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ShiftType {
    #[serde(rename = "DAG")]
    Day,
    #[serde(rename = "NATT")]
    Night,
}

impl FromStr for ShiftType {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DAG" => Ok(ShiftType::Day),
            "NATT" => Ok(ShiftType::Night),
            _ => Err(ServiceError::invalid_value("shift_type")),
        }
    }
}

impl From<&ShiftTypeEntity> for ShiftType {
    fn from(shift_type: &ShiftTypeEntity) -> Self {
        match shift_type {
            ShiftTypeEntity::Day => Self::Day,
            ShiftTypeEntity::Night => Self::Night,
        }
    }
}
derive_from_reference!(ShiftTypeEntity, ShiftType);

impl From<&ShiftType> for ShiftTypeEntity {
    fn from(shift_type: &ShiftType) -> Self {
        match shift_type {
            ShiftType::Day => Self::Day,
            ShiftType::Night => Self::Night,
        }
    }
}
derive_from_reference!(ShiftType, ShiftTypeEntity);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ShiftLabel {
    #[serde(rename = "DAG")]
    Day,
    #[serde(rename = "NATT")]
    Night,
    #[default]
    #[serde(rename = "")]
    Off,
}

impl ShiftLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftLabel::Day => "DAG",
            ShiftLabel::Night => "NATT",
            ShiftLabel::Off => "",
        }
    }
}

impl From<ShiftType> for ShiftLabel {
    fn from(shift_type: ShiftType) -> Self {
        match shift_type {
            ShiftType::Day => ShiftLabel::Day,
            ShiftType::Night => ShiftLabel::Night,
        }
    }
}

impl Display for ShiftLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which cycle table drives teams A to C.
///
/// `Standard` is the schedule table. `LeaveModule` is the table historically
/// used for leave calculations, which moves the first week's night shifts
/// from Wednesday/Thursday to Friday/Saturday.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotationVariant {
    #[default]
    Standard,
    LeaveModule,
}

impl FromStr for RotationVariant {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "standard" => Ok(RotationVariant::Standard),
            "leave-module" => Ok(RotationVariant::LeaveModule),
            _ => Err(ServiceError::invalid_value("rotation_variant")),
        }
    }
}

/// Position of `date` inside the three week cycle starting at `anchor`.
///
/// Dates before the anchor wrap around, so the week before the anchor is week 2.
pub fn week_index(anchor: Date, date: Date) -> u8 {
    let days = (date - anchor).whole_days();
    days.div_euclid(7).rem_euclid(3) as u8
}

/// Nominal hours for a shift label worked by a team.
pub fn planned_hours(team: Team, label: ShiftLabel) -> f32 {
    match (team, label) {
        (_, ShiftLabel::Off) => 0.0,
        (Team::D, ShiftLabel::Day) => 8.0,
        (Team::D, ShiftLabel::Night) => 0.0,
        (_, ShiftLabel::Day | ShiftLabel::Night) => 12.0,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RotationTable {
    variant: RotationVariant,
}

impl RotationTable {
    pub fn new(variant: RotationVariant) -> Self {
        Self { variant }
    }

    /// Label of a rotating team in the given cycle week.
    pub fn cycle_label(&self, week_index: u8, weekday: Weekday) -> ShiftLabel {
        use ShiftLabel::*;
        use Weekday::*;

        match (self.variant, week_index, weekday) {
            (_, 0, Monday | Tuesday) => Day,
            (RotationVariant::Standard, 0, Wednesday | Thursday) => Night,
            (RotationVariant::LeaveModule, 0, Friday | Saturday) => Night,
            (_, 1, Wednesday | Thursday | Friday) => Day,
            (_, 2, Monday | Tuesday) => Night,
            _ => Off,
        }
    }

    /// Canonical label of a team on a date, before any override.
    pub fn resolve(&self, team: Team, date: Date, settings: &Settings) -> ShiftLabel {
        if !team.is_rotating() {
            return if date.weekday().number_from_monday() <= 5 {
                ShiftLabel::Day
            } else {
                ShiftLabel::Off
            };
        }
        let index = week_index(settings.anchor(team), date);
        self.cycle_label(index, date.weekday())
    }

    /// Planned hours of a team on a date following only the pattern.
    pub fn nominal_hours(&self, team: Team, date: Date, settings: &Settings) -> f32 {
        planned_hours(team, self.resolve(team, date, settings))
    }
}
