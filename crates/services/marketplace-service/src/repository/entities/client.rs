//! Client database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{Client, ContactDetails};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::client_service_request::Entity")]
    ServiceRequests,
    #[sea_orm(has_many = "super::client_provider_rating::Entity")]
    ProviderRatings,
}

impl Related<super::client_service_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceRequests.def()
    }
}

impl Related<super::client_provider_rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProviderRatings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Client {
    fn from(model: Model) -> Self {
        Client {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            contact: ContactDetails {
                email: model.email,
                phone: model.phone,
                address: model.address,
            },
            location: model.location,
            id_type: model.id_type,
            id_number: model.id_number,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Client> for ActiveModel {
    fn from(client: &Client) -> Self {
        ActiveModel {
            id: Set(client.id),
            user_id: Set(client.user_id.clone()),
            name: Set(client.name.clone()),
            email: Set(client.contact.email.clone()),
            phone: Set(client.contact.phone.clone()),
            address: Set(client.contact.address.clone()),
            location: Set(client.location.clone()),
            id_type: Set(client.id_type.clone()),
            id_number: Set(client.id_number.clone()),
            created_at: Set(client.created_at),
            updated_at: Set(client.updated_at),
        }
    }
}
