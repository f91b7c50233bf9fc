//! Client-side service request entry with the provider snapshot.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use common::{AppError, AppResult};
use domain::{ClientServiceRequest, ProviderSnapshot, RequestStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "client_service_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub request_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub provider_id: Uuid,
    pub provider_name: String,
    pub provider_contact: Option<String>,
    pub request_date: DateTimeUtc,
    pub status: String,
    pub updated_at: DateTimeUtc,
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

impl TryFrom<Model> for ClientServiceRequest {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let status: RequestStatus = model.status.parse()?;
        Ok(ClientServiceRequest {
            request_id: model.request_id,
            client_id: model.client_id,
            service_id: model.service_id,
            provider_id: model.provider_id,
            provider: ProviderSnapshot {
                name: model.provider_name,
                contact: model.provider_contact,
            },
            request_date: model.request_date,
            status,
            updated_at: model.updated_at,
        })
    }
}

impl From<&ClientServiceRequest> for ActiveModel {
    fn from(request: &ClientServiceRequest) -> Self {
        ActiveModel {
            request_id: Set(request.request_id),
            client_id: Set(request.client_id),
            service_id: Set(request.service_id),
            provider_id: Set(request.provider_id),
            provider_name: Set(request.provider.name.clone()),
            provider_contact: Set(request.provider.contact.clone()),
            request_date: Set(request.request_date),
            status: Set(request.status.as_str().to_string()),
            updated_at: Set(request.updated_at),
        }
    }
}
