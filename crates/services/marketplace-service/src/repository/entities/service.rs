//! Service database entity for SeaORM.

use std::collections::BTreeSet;

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use common::{AppError, AppResult};
use domain::{AdditionalFee, Pricing, Service};

use super::{decode_json, encode_json};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub category_id: Uuid,
    pub icon: Option<String>,
    pub base_price: f64,
    pub currency: String,
    pub percentage_charge: Option<f64>,
    pub additional_fees: Json,
    pub pricing_notes: Option<String>,
    pub locations: Json,
    pub tags: Json,
    pub is_active: bool,
    pub popular: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for Service {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let additional_fees: Vec<AdditionalFee> =
            decode_json(model.additional_fees, "additional_fees")?;
        let locations: BTreeSet<String> = decode_json(model.locations, "locations")?;
        let tags: BTreeSet<String> = decode_json(model.tags, "tags")?;

        Ok(Service {
            id: model.id,
            title: model.title,
            description: model.description,
            long_description: model.long_description,
            category_id: model.category_id,
            icon: model.icon,
            pricing: Pricing {
                base_price: model.base_price,
                currency: model.currency,
                percentage_charge: model.percentage_charge,
                additional_fees,
                notes: model.pricing_notes,
            },
            locations,
            tags,
            is_active: model.is_active,
            popular: model.popular,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Fully-set active model for inserts and whole-row updates
pub fn active_model(service: &Service) -> AppResult<ActiveModel> {
    Ok(ActiveModel {
        id: Set(service.id),
        title: Set(service.title.clone()),
        description: Set(service.description.clone()),
        long_description: Set(service.long_description.clone()),
        category_id: Set(service.category_id),
        icon: Set(service.icon.clone()),
        base_price: Set(service.pricing.base_price),
        currency: Set(service.pricing.currency.clone()),
        percentage_charge: Set(service.pricing.percentage_charge),
        additional_fees: Set(encode_json(&service.pricing.additional_fees, "additional_fees")?),
        pricing_notes: Set(service.pricing.notes.clone()),
        locations: Set(encode_json(&service.locations, "locations")?),
        tags: Set(encode_json(&service.tags, "tags")?),
        is_active: Set(service.is_active),
        popular: Set(service.popular),
        created_at: Set(service.created_at),
        updated_at: Set(service.updated_at),
    })
}
