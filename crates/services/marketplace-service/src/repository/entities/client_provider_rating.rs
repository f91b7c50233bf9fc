//! Rating a client gave to a provider (append-only).

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::ProviderRating;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "client_provider_ratings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub rating: i32,
    pub review: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id",
        on_delete = "Cascade"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProviderRating {
    fn from(model: Model) -> Self {
        ProviderRating {
            id: model.id,
            client_id: model.client_id,
            provider_id: model.provider_id,
            service_id: model.service_id,
            rating: model.rating,
            review: model.review,
            date: model.created_at,
        }
    }
}

impl From<&ProviderRating> for ActiveModel {
    fn from(rating: &ProviderRating) -> Self {
        ActiveModel {
            id: Set(rating.id),
            client_id: Set(rating.client_id),
            provider_id: Set(rating.provider_id),
            service_id: Set(rating.service_id),
            rating: Set(rating.rating),
            review: Set(rating.review.clone()),
            created_at: Set(rating.date),
        }
    }
}
