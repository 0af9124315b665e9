//! Board configuration.
//!
//! A [`BoardConfig`] is loaded once (usually from a TOML file) and passed by
//! reference into every model and solver. Nothing in the crate reads
//! configuration on its own.
//!
//! The file format is a flat set of named numbers:
//!
//! ```toml
//! OuterRadius = 40.0          # mm
//! InnerRadius = 5.0           # mm, optional
//! GapBetweenTraces = 0.15     # mm
//! CopperResistivity = 1.72e-8 # ohm metre
//! OuterLayerThickness = 1.0   # oz
//! InnerLayerThickness = 0.5   # oz
//! TraceThicknessPerOz = 0.0347 # mm
//! NumberOfLayers = 6
//! Resistance = 35.0           # ohm
//! ViaSize = 0.6               # mm, optional
//! ViaDrill = 0.3              # mm, optional
//! ```

mod error;

pub use error::ConfigError;

use std::path::Path;

use serde::Deserialize;
use uom::si::{
    electrical_resistance::ohm,
    electrical_resistivity::ohm_meter,
    f64::{ElectricalResistance, ElectricalResistivity, Length},
};

use crate::support::{
    constraint::{ConstraintResult, NonNegative, StrictlyPositive},
    trace::{Layer, TraceResistance},
    units::{from_mm, mm},
};

/// Physical and electrical parameters of a magnetorquer board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardConfig {
    /// Radius of the outermost coil, measured to the trace center.
    pub outer_radius: Length,

    /// Smallest radius a variable-width spiral may reach.
    pub inner_radius: Length,

    /// Copper-to-copper gap between adjacent traces.
    pub gap: Length,

    /// Resistivity of the copper.
    pub resistivity: ElectricalResistivity,

    /// Copper weight of the front and back layers, in ounces.
    pub exterior_copper_oz: f64,

    /// Copper weight of the interior layers, in ounces.
    pub interior_copper_oz: f64,

    /// Copper thickness of one ounce of plating.
    pub thickness_per_oz: Length,

    /// Total number of copper layers.
    pub layers: usize,

    /// Resistance budget for all layers together.
    pub resistance: ElectricalResistance,

    /// Via pad diameter used by the exporter.
    pub via_size: Length,

    /// Via drill diameter used by the exporter.
    pub via_drill: Length,
}

impl BoardConfig {
    /// Reads and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid TOML,
    /// or contains a value that fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed TOML or invalid values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        file.validate()
    }

    /// Copper thickness of the given layer.
    #[must_use]
    pub fn trace_thickness(&self, layer: Layer) -> Length {
        let oz = match layer {
            Layer::Exterior => self.exterior_copper_oz,
            Layer::Interior => self.interior_copper_oz,
        };
        self.thickness_per_oz * oz
    }

    /// Resistance model of traces on the given layer.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the resistivity or the layer's copper thickness is not
    /// strictly positive, which [`BoardConfig::load`] already rules out.
    pub fn trace(&self, layer: Layer) -> ConstraintResult<TraceResistance> {
        TraceResistance::new(self.resistivity, self.trace_thickness(layer))
    }

    /// Center-to-center spacing that gives a trace of `length` exactly
    /// `resistance` on `layer`.
    ///
    /// The spacing is the required trace width plus the configured gap.
    #[must_use]
    pub fn spacing_from_length(
        &self,
        length: Length,
        resistance: ElectricalResistance,
        layer: Layer,
    ) -> Length {
        self.resistivity * length / (self.trace_thickness(layer) * resistance) + self.gap
    }

    /// Number of interior copper layers.
    #[must_use]
    pub fn interior_layers(&self) -> usize {
        self.layers.saturating_sub(2)
    }

    /// Resistance left for each interior layer once both exterior layers
    /// take `exterior` each.
    ///
    /// Returns `None` for a two-layer board.
    #[must_use]
    pub fn interior_resistance(
        &self,
        exterior: ElectricalResistance,
    ) -> Option<ElectricalResistance> {
        match self.interior_layers() {
            0 => None,
            n => Some((self.resistance - exterior * 2.0) / n as f64),
        }
    }
}

/// On-disk representation, validated into [`BoardConfig`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct ConfigFile {
    outer_radius: f64,
    #[serde(default = "ConfigFile::default_inner_radius")]
    inner_radius: f64,
    gap_between_traces: f64,
    copper_resistivity: f64,
    outer_layer_thickness: f64,
    inner_layer_thickness: f64,
    trace_thickness_per_oz: f64,
    number_of_layers: usize,
    resistance: f64,
    #[serde(default = "ConfigFile::default_via_size")]
    via_size: f64,
    #[serde(default = "ConfigFile::default_via_drill")]
    via_drill: f64,
}

impl ConfigFile {
    fn default_inner_radius() -> f64 {
        5.0
    }

    fn default_via_size() -> f64 {
        0.6
    }

    fn default_via_drill() -> f64 {
        0.3
    }

    fn validate(self) -> Result<BoardConfig, ConfigError> {
        let positive = |field: &'static str, value: f64| {
            StrictlyPositive::new(value)
                .map(|v| v.into_inner())
                .map_err(|source| ConfigError::Invalid { field, source })
        };
        let non_negative = |field: &'static str, value: f64| {
            NonNegative::new(value)
                .map(|v| v.into_inner())
                .map_err(|source| ConfigError::Invalid { field, source })
        };

        if self.number_of_layers < 2 {
            return Err(ConfigError::TooFewLayers(self.number_of_layers));
        }

        let config = BoardConfig {
            outer_radius: from_mm(positive("OuterRadius", self.outer_radius)?),
            inner_radius: from_mm(non_negative("InnerRadius", self.inner_radius)?),
            gap: from_mm(non_negative("GapBetweenTraces", self.gap_between_traces)?),
            resistivity: ElectricalResistivity::new::<ohm_meter>(positive(
                "CopperResistivity",
                self.copper_resistivity,
            )?),
            exterior_copper_oz: positive("OuterLayerThickness", self.outer_layer_thickness)?,
            interior_copper_oz: positive("InnerLayerThickness", self.inner_layer_thickness)?,
            thickness_per_oz: from_mm(positive(
                "TraceThicknessPerOz",
                self.trace_thickness_per_oz,
            )?),
            layers: self.number_of_layers,
            resistance: ElectricalResistance::new::<ohm>(positive(
                "Resistance",
                self.resistance,
            )?),
            via_size: from_mm(positive("ViaSize", self.via_size)?),
            via_drill: from_mm(positive("ViaDrill", self.via_drill)?),
        };

        if mm(config.inner_radius) >= mm(config.outer_radius) {
            return Err(ConfigError::InnerRadiusTooLarge {
                inner: config.inner_radius,
                outer: config.outer_radius,
            });
        }

        Ok(config)
    }
}
