//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use resona_core::{EffectWithParams, ParamId, ParameterInfo};
use resona_effects::{EffectKind, create};

use crate::error::ConfigError;

/// One stored knob.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PresetParam {
    /// Stable parameter id (see the effect's parameter table).
    pub id: u32,
    /// Normalized knob position in `[0, 1]`.
    pub knob: f32,
}

/// Snapshot of every knob of one effect.
///
/// Knobs are stored rather than engineering values, so applying a preset
/// reproduces the captured state bit for bit.
///
/// # TOML Format
///
/// ```toml
/// name = "Big Hall"
/// effect = "reverb"
/// sample_rate = 48000
///
/// [[params]]
/// id = 800
/// knob = 0.71
///
/// [[params]]
/// id = 803
/// knob = 0.35
/// ```
///
/// # Example
///
/// ```rust
/// use resona_config::Preset;
/// use resona_core::ParameterInfo;
/// use resona_effects::{EffectKind, Reverb};
///
/// let mut hall = Reverb::new(48000.0);
/// hall.set_param(0, 0.71);
/// let preset = Preset::capture("Big Hall", EffectKind::Reverb, &hall);
///
/// let mut other = Reverb::new(48000.0);
/// preset.apply(&mut other).unwrap();
/// assert_eq!(other.get_param(0), 0.71);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Display name.
    pub name: String,

    /// Registry id of the effect, e.g. `"reverb"`.
    pub effect: String,

    /// Sample rate the preset was captured at, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,

    /// Stored knobs.
    #[serde(default)]
    pub params: Vec<PresetParam>,
}

impl Preset {
    /// Creates an empty preset for `kind`.
    pub fn new(name: impl Into<String>, kind: EffectKind) -> Self {
        Self {
            name: name.into(),
            effect: kind.id().to_string(),
            sample_rate: None,
            params: Vec::new(),
        }
    }

    /// Records the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    /// Snapshots every knob of `effect`.
    pub fn capture(
        name: impl Into<String>,
        kind: EffectKind,
        effect: &(impl ParameterInfo + ?Sized),
    ) -> Self {
        let params = (0..effect.param_count())
            .filter_map(|i| {
                effect.param_info(i).map(|desc| PresetParam {
                    id: desc.id.0,
                    knob: effect.get_param(i),
                })
            })
            .collect();
        Self {
            params,
            ..Self::new(name, kind)
        }
    }

    /// Effect kind named by the preset.
    pub fn kind(&self) -> Result<EffectKind, ConfigError> {
        EffectKind::from_id(&self.effect)
            .ok_or_else(|| ConfigError::UnknownEffect(self.effect.clone()))
    }

    /// Checks that the effect id is known and every knob is a finite
    /// number in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.kind()?;
        match self
            .params
            .iter()
            .find(|p| !p.knob.is_finite() || !(0.0..=1.0).contains(&p.knob))
        {
            Some(bad) => Err(ConfigError::InvalidKnob {
                id: bad.id,
                value: bad.knob,
            }),
            None => Ok(()),
        }
    }

    /// Replays the stored knobs through `set_parameter`.
    ///
    /// Ids the effect does not know are skipped with a warning. Returns the
    /// number of knobs applied. Nothing is applied if a knob is invalid.
    pub fn apply(&self, effect: &mut (impl ParameterInfo + ?Sized)) -> Result<usize, ConfigError> {
        self.validate()?;
        let mut applied = 0;
        for param in &self.params {
            if effect.set_parameter(ParamId(param.id), param.knob) {
                applied += 1;
            } else {
                tracing::warn!(preset = %self.name, id = param.id, "skipping unknown parameter id");
            }
        }
        Ok(applied)
    }

    /// Like [`apply`](Self::apply), but first checks that the preset was
    /// made for `kind`.
    pub fn apply_to(
        &self,
        kind: EffectKind,
        effect: &mut (impl ParameterInfo + ?Sized),
    ) -> Result<usize, ConfigError> {
        let found = self.kind()?;
        if found != kind {
            return Err(ConfigError::effect_mismatch(kind.id(), found.id()));
        }
        self.apply(effect)
    }

    /// Builds the named effect and applies the preset to it.
    pub fn instantiate(
        &self,
        sample_rate: f32,
    ) -> Result<Box<dyn EffectWithParams + Send>, ConfigError> {
        let mut effect = create(self.kind()?, sample_rate);
        self.apply(effect.as_mut())?;
        Ok(effect)
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %preset.name, "loaded preset");
        Ok(preset)
    }

    /// Parse and validate a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let preset: Preset = toml::from_str(toml_str)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved preset");
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_effects::{Compressor, Delay};

    #[test]
    fn test_capture_lists_every_parameter() {
        let comp = Compressor::new(48000.0);
        let preset = Preset::capture("Default", EffectKind::Compressor, &comp);
        assert_eq!(preset.effect, "compressor");
        let ids: Vec<u32> = preset.params.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![600, 601, 602, 603, 604, 605, 606]);
    }

    #[test]
    fn test_parse_hand_written() {
        let preset = Preset::from_toml(
            r#"
            name = "Slapback"
            effect = "delay"
            sample_rate = 44100

            [[params]]
            id = 102
            knob = 0.06
            "#,
        )
        .unwrap();
        assert_eq!(preset.sample_rate, Some(44100));
        assert_eq!(preset.params, vec![PresetParam { id: 102, knob: 0.06 }]);
    }

    #[test]
    fn test_unknown_effect_rejected() {
        let err = Preset::from_toml("name = \"x\"\neffect = \"phaser\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEffect(ref id) if id == "phaser"));
    }

    #[test]
    fn test_out_of_range_knob_rejected() {
        let err = Preset::from_toml(
            "name = \"x\"\neffect = \"delay\"\n[[params]]\nid = 100\nknob = 1.5\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKnob { id: 100, .. }));
    }

    #[test]
    fn test_apply_skips_unknown_ids() {
        let mut preset = Preset::new("x", EffectKind::Delay);
        preset.params.push(PresetParam { id: 100, knob: 0.25 });
        preset.params.push(PresetParam { id: 999, knob: 0.5 });
        let mut delay = Delay::new(48000.0);
        assert_eq!(preset.apply(&mut delay).unwrap(), 1);
        assert_eq!(delay.get_param(0), 0.25);
    }

    #[test]
    fn test_apply_to_checks_kind() {
        let preset = Preset::new("x", EffectKind::Delay);
        let mut comp = Compressor::new(48000.0);
        let err = preset.apply_to(EffectKind::Compressor, &mut comp).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EffectMismatch { ref expected, ref found }
                if expected == "compressor" && found == "delay"
        ));
    }

    #[test]
    fn test_sample_rate_is_optional_in_output() {
        let preset = Preset::new("x", EffectKind::Reverb);
        assert!(!preset.to_toml().unwrap().contains("sample_rate"));
        let preset = preset.with_sample_rate(96000);
        assert!(preset.to_toml().unwrap().contains("sample_rate = 96000"));
    }
}
