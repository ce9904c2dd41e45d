use std::env;

use async_trait::async_trait;
use service::{
    config::{Config, ConfigService},
    rotation::RotationVariant,
    ServiceError,
};

pub struct ConfigServiceImpl;

#[async_trait]
impl ConfigService for ConfigServiceImpl {
    async fn get_config(&self) -> Result<Config, ServiceError> {
        let rotation_variant = match env::var("ROTATION_VARIANT") {
            Ok(value) => value.parse()?,
            Err(_) => RotationVariant::default(),
        };

        Ok(Config { rotation_variant })
    }
}
