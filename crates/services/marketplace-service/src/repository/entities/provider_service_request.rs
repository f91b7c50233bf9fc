//! Provider-side service request entry.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use common::{AppError, AppResult};
use domain::{ProviderServiceRequest, RequestStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "provider_service_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub request_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub client_id: String,
    pub request_date: DateTimeUtc,
    pub status: String,
    pub updated_at: DateTimeUtc,
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

impl TryFrom<Model> for ProviderServiceRequest {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let status: RequestStatus = model.status.parse()?;
        Ok(ProviderServiceRequest {
            request_id: model.request_id,
            provider_id: model.provider_id,
            service_id: model.service_id,
            client_id: model.client_id,
            request_date: model.request_date,
            status,
            updated_at: model.updated_at,
        })
    }
}

impl From<&ProviderServiceRequest> for ActiveModel {
    fn from(request: &ProviderServiceRequest) -> Self {
        ActiveModel {
            request_id: Set(request.request_id),
            provider_id: Set(request.provider_id),
            service_id: Set(request.service_id),
            client_id: Set(request.client_id.clone()),
            request_date: Set(request.request_date),
            status: Set(request.status.as_str().to_string()),
            updated_at: Set(request.updated_at),
        }
    }
}
