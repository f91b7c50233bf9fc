//! Rating a client left on a provider (append-only).

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::ClientRating;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "provider_client_ratings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub client_id: String,
    pub request_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub rating: i32,
    pub review: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::provider::Entity",
        from = "Column::ProviderId",
        to = "super::provider::Column::Id",
        on_delete = "Cascade"
    )]
    Provider,
}

impl Related<super::provider::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Provider.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ClientRating {
    fn from(model: Model) -> Self {
        ClientRating {
            id: model.id,
            provider_id: model.provider_id,
            client_id: model.client_id,
            request_id: model.request_id,
            service_id: model.service_id,
            rating: model.rating,
            review: model.review,
            date: model.created_at,
        }
    }
}

impl From<&ClientRating> for ActiveModel {
    fn from(rating: &ClientRating) -> Self {
        ActiveModel {
            id: Set(rating.id),
            provider_id: Set(rating.provider_id),
            client_id: Set(rating.client_id.clone()),
            request_id: Set(rating.request_id),
            service_id: Set(rating.service_id),
            rating: Set(rating.rating),
            review: Set(rating.review.clone()),
            created_at: Set(rating.date),
        }
    }
}
