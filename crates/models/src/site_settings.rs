use sea_orm::{entity::prelude::*, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Primary key of the only row.
pub const SINGLETON_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub maintenance_mode: bool,
    pub new_user_registration: bool,
    pub require_email_verification: bool,
    pub max_automations_per_user: i32,
    pub site_name: String,
    pub support_email: String,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn defaults() -> ActiveModel {
    ActiveModel {
        id: Set(SINGLETON_ID),
        maintenance_mode: Set(false),
        new_user_registration: Set(true),
        require_email_verification: Set(false),
        max_automations_per_user: Set(10),
        site_name: Set("CrypGo".to_string()),
        support_email: Set("support@crypgo.com".to_string()),
        updated_at: Set(Utc::now().into()),
    }
}
