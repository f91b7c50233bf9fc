//! Provider database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use common::{AppError, AppResult};
use domain::{ContactDetails, Provider, Witness};

use super::{decode_json, encode_json};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "providers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub witnesses: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::provider_service_request::Entity")]
    ServiceRequests,
    #[sea_orm(has_many = "super::provider_client_rating::Entity")]
    ClientRatings,
}

impl Related<super::provider_service_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceRequests.def()
    }
}

impl Related<super::provider_client_rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientRatings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Provider {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let witnesses: Vec<Witness> = decode_json(model.witnesses, "witnesses")?;

        Ok(Provider {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            contact: ContactDetails {
                email: model.email,
                phone: model.phone,
                address: model.address,
            },
            witnesses,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Fully-set active model for inserts and whole-row updates
pub fn active_model(provider: &Provider) -> AppResult<ActiveModel> {
    Ok(ActiveModel {
        id: Set(provider.id),
        user_id: Set(provider.user_id.clone()),
        name: Set(provider.name.clone()),
        email: Set(provider.contact.email.clone()),
        phone: Set(provider.contact.phone.clone()),
        address: Set(provider.contact.address.clone()),
        witnesses: Set(encode_json(&provider.witnesses, "witnesses")?),
        created_at: Set(provider.created_at),
        updated_at: Set(provider.updated_at),
    })
}
