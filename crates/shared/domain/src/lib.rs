//! Domain layer - Core marketplace entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! categories (with their two child shapes), services, providers, clients,
//! the request status vocabulary and rating rules.

pub mod category;
pub mod client;
pub mod constants;
pub mod contact;
pub mod error;
pub mod provider;
pub mod rating;
pub mod service;
pub mod status;

pub use category::{
    Category, CategoryChildren, CategoryDeletionInfo, CategoryDetail, CategoryResponse,
    CategoryWithCount, ChildMode, CreateCategory, NewSubcategory, ReconcileReport, Subcategory,
    UpdateCategory, UpdateSubcategory,
};
pub use client::{
    Client, ClientServiceRequest, ClientStats, CreateClient, NewClientServiceRequest,
    NewProviderRating, ProviderRating, ProviderSnapshot, UpdateClient,
};
pub use constants::*;
pub use contact::ContactDetails;
pub use error::{DomainError, DomainResult};
pub use provider::{
    ClientRating, CreateProvider, NewClientRating, NewProviderServiceRequest, Provider,
    ProviderServiceRequest, ProviderStats, ProviderSummary, UpdateProvider, Witness,
};
pub use rating::{average_rating, validate_rating};
pub use service::{AdditionalFee, CreateService, Pricing, Service, ServiceFilters, UpdateService};
pub use status::{RequestStatus, StatusBreakdown};
