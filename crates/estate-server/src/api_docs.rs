// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for estate-server, served at `/api/openapi.json`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Estate Server API",
        version = "1.0.0",
        description = "Company provisioning for the Estate property platform. Callable endpoints take {\"data\": ...} and answer {\"result\": ...} or {\"error\": {\"status\", \"message\"}}.",
        license(name = "Proprietary"),
        contact(
            name = "Geoffrey Huntley",
            email = "ghuntley@ghuntley.com",
            url = "https://ghuntley.com"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "provisioning", description = "Company and owner account provisioning (super-administrators only)"),
        (name = "health", description = "Health checks")
    ),
    paths(
        crate::routes::provision::provision_company,
        crate::routes::health::health_check,
    ),
    components(
        schemas(
            estate_server_provisioning::ProvisionCompanyRequest,
            estate_server_provisioning::ProvisionCompanyResponse,
            crate::routes::provision::ProvisionCompanyCall,
            crate::routes::provision::ProvisionCompanyResult,
            crate::callable::CallableErrorResponse,
            crate::callable::CallableErrorDetail,
            crate::routes::health::HealthResponse,
            crate::routes::health::HealthComponents,
            crate::routes::health::ComponentHealth,
            crate::routes::health::HealthStatus,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn document_lists_callable_schemas() {
		let doc = ApiDoc::openapi();
		let schemas = &doc.components.as_ref().unwrap().schemas;
		assert!(schemas.contains_key("ProvisionCompanyRequest"));
		assert!(schemas.contains_key("CallableErrorResponse"));
		assert!(doc.paths.paths.contains_key("/provisionCompany"));
	}
}
