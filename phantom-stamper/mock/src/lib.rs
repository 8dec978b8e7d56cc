mod mock_clock;
mod mock_organization_service;
mod mock_organization_service_client;

pub use crate::{
    mock_clock::MockClock, mock_organization_service::MockOrganizationService,
    mock_organization_service_client::MockOrganizationServiceClient,
};
