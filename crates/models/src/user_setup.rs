use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_setups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub years_experience: Option<String>,
    pub top_skills: Option<String>,
    pub resume_file_name: Option<String>,
    pub resume_file_path: Option<String>,
    pub setup_complete: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Reasons the setup cannot be marked complete yet; empty when it can.
    pub fn missing_requirements(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").is_empty();
        let mut missing = Vec::new();
        if blank(&self.resume_file_path) {
            missing.push("resume upload is required");
        }
        if blank(&self.full_name) {
            missing.push("full name is required");
        }
        if blank(&self.email) {
            missing.push("email is required");
        }
        missing
    }
}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

pub fn new_for_user(user_id: Uuid) -> ActiveModel {
    let now = Utc::now().into();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        full_name: Set(None),
        email: Set(None),
        phone: Set(None),
        location: Set(None),
        linkedin_url: Set(None),
        years_experience: Set(None),
        top_skills: Set(None),
        resume_file_name: Set(None),
        resume_file_path: Set(None),
        setup_complete: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
}
