//! TankMix MCP Server Implementation
//!
//! Implements the MCP server with all TankMix planning tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;

use crate::mix::units::{MeasurementUnit, RateBasis};
use crate::models::{ContainerType, Product, ProductType, TankMixProduct};
use crate::tools::containers;
use crate::tools::loads;
use crate::tools::plan;
use crate::tools::status::StatusTracker;
use crate::tools::units;

/// TankMix MCP Service
#[derive(Clone)]
pub struct TankMixService {
    status_tracker: Arc<std::sync::Mutex<StatusTracker>>,
    tool_router: ToolRouter<TankMixService>,
}

impl TankMixService {
    pub fn new() -> Self {
        Self {
            status_tracker: Arc::new(std::sync::Mutex::new(StatusTracker::new())),
            tool_router: Self::tool_router(),
        }
    }

    fn record(&self, tool_name: &str) {
        if let Ok(mut tracker) = self.status_tracker.lock() {
            tracker.record(tool_name);
        }
    }
}

impl Default for TankMixService {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Plan Parameter Structs
// ============================================================================

/// One product in a mix, as supplied by the caller
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MixProductParam {
    /// Product identifier from the caller's catalog
    pub product_id: String,
    /// Display name of the product
    pub product_name: String,
    /// Physical form: "liquid", "dry" (or legacy "granular"), or "bulk"
    #[serde(default = "default_product_type")]
    pub product_type: String,
    /// Application rate in `unit` per `rate_basis`
    pub rate: f64,
    /// Measurement unit: fluid-ounce, pint, quart, gallon, ounce, or pound
    pub unit: String,
    /// Rate basis: "per-acre" (default) or "per-100-gal-carrier"
    #[serde(default = "default_rate_basis")]
    pub rate_basis: String,
    /// Allow-list of container ids for breakdowns (optional)
    #[serde(default)]
    pub preferred_container_ids: Vec<String>,
}

fn default_product_type() -> String {
    "liquid".to_string()
}

fn default_rate_basis() -> String {
    "per-acre".to_string()
}

impl MixProductParam {
    fn into_tank_mix_product(self) -> TankMixProduct {
        let unit = MeasurementUnit::from_label(&self.unit);
        let basis = RateBasis::from_str(&self.rate_basis);
        TankMixProduct::new(
            Product {
                id: self.product_id,
                name: self.product_name,
                product_type: ProductType::from_str(&self.product_type),
                default_rate: self.rate,
                measurement_unit: unit,
                rate_basis: basis,
                preferred_container_ids: self.preferred_container_ids,
                package_size: None,
            },
            self.rate,
            basis,
        )
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanTankMixParams {
    /// Sprayer tank capacity in gallons
    pub tank_size: f64,
    /// Carrier application rate in gallons per acre
    pub carrier_rate: f64,
    /// Field size in acres
    pub acres: f64,
    /// Number of loads to split into (optional; raised to the minimum)
    pub requested_loads: Option<usize>,
    /// Products in the mix
    #[serde(default)]
    pub products: Vec<MixProductParam>,
}

// ============================================================================
// Load Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateEvenSplitParams {
    /// Total spray volume in gallons
    pub total_volume: f64,
    /// Number of loads to split into
    pub number_of_loads: usize,
    /// Sprayer tank capacity in gallons
    pub tank_size: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RedistributeLoadsParams {
    /// Current per-load volumes in gallons
    pub volumes: Vec<f64>,
    /// Index of the load being changed (0-based)
    pub changed_index: usize,
    /// New volume for the changed load in gallons
    pub new_volume: f64,
    /// Total spray volume in gallons
    pub total_volume: f64,
    /// Sprayer tank capacity in gallons
    pub tank_size: f64,
    /// Indices locked by earlier manual edits (0-based)
    #[serde(default)]
    pub locked_loads: Vec<usize>,
}

// ============================================================================
// Unit Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertRateParams {
    /// Application rate value
    pub rate: f64,
    /// Measurement unit: fluid-ounce, pint, quart, gallon, ounce, or pound
    pub unit: String,
    /// Rate basis: "per-acre" (default) or "per-100-gal-carrier"
    #[serde(default = "default_rate_basis")]
    pub rate_basis: String,
    /// Field size in acres (used by per-acre rates)
    #[serde(default)]
    pub acres: f64,
    /// Total carrier volume in gallons (used by per-100-gal-carrier rates)
    #[serde(default)]
    pub total_carrier_volume: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseLegacyUnitParams {
    /// Free-text rate label, e.g. "oz/acre" or "qt/100 gal"
    pub label: String,
}

// ============================================================================
// Container Parameter Structs
// ============================================================================

/// One container type in the caller's catalog
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ContainerParam {
    /// Container identifier
    pub id: String,
    /// Display name, e.g. "2.5 gal Jug"
    pub name: String,
    /// Capacity in gallons (liquid) or pounds (dry)
    pub size: f64,
    /// Unit label: "gal" or "lbs"
    #[serde(default = "default_container_unit")]
    pub unit: String,
    /// Product form this container holds: "liquid", "dry", or "bulk"
    #[serde(default = "default_product_type")]
    pub product_type: String,
    /// Whether this container is currently stocked (default true)
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_container_unit() -> String {
    "gal".to_string()
}

fn default_available() -> bool {
    true
}

impl ContainerParam {
    fn into_container_type(self) -> ContainerType {
        ContainerType {
            id: self.id,
            name: self.name,
            size: self.size,
            unit: self.unit,
            product_type: ProductType::from_str(&self.product_type),
            available: self.available,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ContainerBreakdownParams {
    /// Amount to pack, in gallons (liquid) or pounds (dry)
    pub total_amount: f64,
    /// Product form: "liquid", "dry" (or legacy "granular"), or "bulk"
    #[serde(default = "default_product_type")]
    pub product_type: String,
    /// Container catalog to pack from
    pub containers: Vec<ContainerParam>,
    /// Allow-list of container ids; empty means no restriction
    #[serde(default)]
    pub preferred_container_ids: Vec<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl TankMixService {
    // --- Status ---

    #[tool(description = "Get the current status of the TankMix service including build info, uptime, and tool call counts")]
    fn tankmix_status(&self) -> Result<CallToolResult, McpError> {
        self.record("tankmix_status");
        let status = self
            .status_tracker
            .lock()
            .map_err(|_| McpError::internal_error("Status tracker poisoned", None))?
            .get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for planning tank mixes. Call this when starting a new mix planning session or when unsure how to use the planning tools.")]
    fn mix_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::MIX_INSTRUCTIONS;
        self.record("mix_instructions");
        Ok(CallToolResult::success(vec![Content::text(
            MIX_INSTRUCTIONS,
        )]))
    }

    // --- Planning ---

    #[tool(description = "Plan a full tank mix: total volume from acres x carrier rate, per-product totals from rates, and an even split over the minimum number of loads (or more if requested)")]
    fn plan_tank_mix(
        &self,
        Parameters(p): Parameters<PlanTankMixParams>,
    ) -> Result<CallToolResult, McpError> {
        self.record("plan_tank_mix");
        let products: Vec<TankMixProduct> = p
            .products
            .into_iter()
            .map(MixProductParam::into_tank_mix_product)
            .collect();
        let result = plan::plan_tank_mix(
            p.tank_size,
            p.carrier_rate,
            p.acres,
            p.requested_loads,
            products,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Loads ---

    #[tool(description = "Split a total spray volume evenly across a number of loads, each capped at tank capacity")]
    fn calculate_even_split(
        &self,
        Parameters(p): Parameters<CalculateEvenSplitParams>,
    ) -> Result<CallToolResult, McpError> {
        self.record("calculate_even_split");
        let result = loads::even_split(p.total_volume, p.number_of_loads, p.tank_size)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Manually set one load's volume and redistribute the slack over the remaining unlocked loads. The changed load is locked; pass previously locked indices so they stay put. Check the warning field for over-constrained results.")]
    fn redistribute_loads(
        &self,
        Parameters(p): Parameters<RedistributeLoadsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.record("redistribute_loads");
        let result = loads::redistribute(
            p.volumes,
            p.changed_index,
            p.new_volume,
            p.total_volume,
            p.tank_size,
            p.locked_loads,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Units ---

    #[tool(description = "Convert an application rate into an absolute amount in gallons (liquid units) or pounds (dry units)")]
    fn convert_rate(
        &self,
        Parameters(p): Parameters<ConvertRateParams>,
    ) -> Result<CallToolResult, McpError> {
        self.record("convert_rate");
        let result = units::convert_rate(
            p.rate,
            &p.unit,
            &p.rate_basis,
            p.acres,
            p.total_carrier_volume,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Map a legacy free-text rate label like 'oz/acre' or 'qt/100 gal' to a structured unit and rate basis")]
    fn parse_legacy_unit(
        &self,
        Parameters(p): Parameters<ParseLegacyUnitParams>,
    ) -> Result<CallToolResult, McpError> {
        self.record("parse_legacy_unit");
        let result =
            units::parse_legacy_unit(&p.label).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Containers ---

    #[tool(description = "Pack a product amount into whole containers from a catalog, largest first, with the remainder formatted for manual measurement (e.g. '2x 2.5 gal Jug + 1 gal 38 oz')")]
    fn container_breakdown(
        &self,
        Parameters(p): Parameters<ContainerBreakdownParams>,
    ) -> Result<CallToolResult, McpError> {
        self.record("container_breakdown");
        let catalog: Vec<ContainerType> = p
            .containers
            .into_iter()
            .map(ContainerParam::into_container_type)
            .collect();
        let result = containers::container_breakdown(
            catalog,
            p.total_amount,
            &p.product_type,
            p.preferred_container_ids,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for TankMixService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tankmix".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("TankMix Planner".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "TankMix Planner - Spray mix load planning and container packing. \
                 IMPORTANT: Call mix_instructions when starting a planning session. \
                 Planning: plan_tank_mix (full plan from tank size, carrier rate, acres, and products). \
                 Loads: calculate_even_split, redistribute_loads (manual edits lock the changed load; \
                 watch the warning field for over-constrained redistributions). \
                 Units: convert_rate, parse_legacy_unit (maps labels like 'oz/acre'). \
                 Containers: container_breakdown (greedy largest-first packing with formatted remainder). \
                 All volumes are gallons and dry amounts pounds, rounded to 2 decimal places."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_product_param_conversion() {
        let param = MixProductParam {
            product_id: "herb-1".to_string(),
            product_name: "Broadleaf Herbicide".to_string(),
            product_type: "liquid".to_string(),
            rate: 32.0,
            unit: "fl oz".to_string(),
            rate_basis: "per-acre".to_string(),
            preferred_container_ids: Vec::new(),
        };
        let product = param.into_tank_mix_product();
        assert_eq!(product.product.measurement_unit, MeasurementUnit::FluidOunce);
        assert_eq!(product.rate_basis, RateBasis::PerAcre);
        assert_eq!(product.rate, 32.0);
    }

    #[test]
    fn test_container_param_conversion() {
        let param = ContainerParam {
            id: "dry-50lb".to_string(),
            name: "50 lb Bag".to_string(),
            size: 50.0,
            unit: "lbs".to_string(),
            product_type: "granular".to_string(),
            available: true,
        };
        let container = param.into_container_type();
        assert_eq!(container.product_type, ProductType::Dry);
        assert!(container.available);
    }

    #[test]
    fn test_service_records_tool_calls() {
        let service = TankMixService::new();
        service.record("plan_tank_mix");
        service.record("plan_tank_mix");
        let status = service.status_tracker.lock().unwrap().get_status();
        assert_eq!(status.tool_calls.get("plan_tank_mix"), Some(&2));
    }
}
