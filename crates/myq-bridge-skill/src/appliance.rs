//! Mapping MyQ devices to appliance descriptors.

use myq_bridge_client::Device;

use crate::envelope::{ApplianceAction, ApplianceDescriptor};
use crate::error::{Result, SkillError};
use crate::types::{ApplianceDetails, SkillConfig};

const DESC_ATTRIBUTE: &str = "desc";
const NAME_ATTRIBUTE: &str = "name";

/// Describe every recognized device, in the order MyQ listed them.
///
/// Devices of unrecognized types are skipped. A recognized device that
/// cannot be described fails the whole discovery: no partial lists.
///
/// # Errors
///
/// Returns `SkillError::AttributeNotFound` if a recognized device lacks its
/// `desc` or `name` attribute.
pub fn discover(devices: &[Device], config: &SkillConfig) -> Result<Vec<ApplianceDescriptor>> {
    devices
        .iter()
        .filter(|device| config.is_recognized(device.device_type_id))
        .map(|device| describe(device, config))
        .collect()
}

/// Build the assistant-facing descriptor for one device.
///
/// # Errors
///
/// Returns `SkillError::AttributeNotFound` if `desc` or `name` is missing.
pub fn describe(device: &Device, config: &SkillConfig) -> Result<ApplianceDescriptor> {
    let desc = required_attribute(device, DESC_ATTRIBUTE)?;
    let name = required_attribute(device, NAME_ATTRIBUTE)?;

    Ok(ApplianceDescriptor {
        appliance_id: device.device_id.clone(),
        manufacturer_name: config.manufacturer_name.clone(),
        model_name: name.to_string(),
        version: config.appliance_version.clone(),
        friendly_name: desc.to_string(),
        friendly_description: desc.to_string(),
        is_reachable: device.is_online(),
        actions: vec![ApplianceAction::TurnOn, ApplianceAction::TurnOff],
        additional_appliance_details: ApplianceDetails {
            device_id: device.device_id.clone(),
        },
    })
}

fn required_attribute<'a>(device: &'a Device, attribute: &'static str) -> Result<&'a str> {
    device
        .attribute(attribute)
        .ok_or_else(|| SkillError::AttributeNotFound {
            device_id: device.device_id.clone(),
            attribute,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use myq_bridge_client::Attribute;
    use myq_bridge_core::DeviceId;

    fn device(id: &str, type_id: i64, attributes: &[(&str, &str)]) -> Device {
        Device {
            device_id: DeviceId::new(id).unwrap(),
            device_type_id: type_id,
            attributes: attributes
                .iter()
                .map(|(name, value)| Attribute::new(*name, *value))
                .collect(),
        }
    }

    fn garage(id: &str, online: &str) -> Device {
        device(
            id,
            17,
            &[("desc", "Garage 1"), ("name", "LMxxx"), ("online", online)],
        )
    }

    #[test]
    fn unrecognized_types_are_excluded() {
        let devices = vec![
            device("gw", 1, &[]),
            garage("D1", "True"),
            device("light", 3, &[("desc", "Porch")]),
        ];

        let appliances = discover(&devices, &SkillConfig::default()).unwrap();
        assert_eq!(appliances.len(), 1);
        assert_eq!(appliances[0].appliance_id.as_str(), "D1");
    }

    #[test]
    fn descriptor_fields() {
        let appliance = describe(&garage("D1", "True"), &SkillConfig::default()).unwrap();

        assert_eq!(appliance.manufacturer_name, "Liftmaster");
        assert_eq!(appliance.model_name, "LMxxx");
        assert_eq!(appliance.version, "VER01");
        assert_eq!(appliance.friendly_name, "Garage 1");
        assert_eq!(appliance.friendly_description, "Garage 1");
        assert!(appliance.is_reachable);
        assert_eq!(
            appliance.actions,
            vec![ApplianceAction::TurnOn, ApplianceAction::TurnOff]
        );
    }

    #[test]
    fn device_id_round_trips() {
        for id in ["2204578", "D1", " spaced id "] {
            let source = garage(id, "True");
            let appliance = describe(&source, &SkillConfig::default()).unwrap();
            assert_eq!(appliance.additional_appliance_details.device_id, source.device_id);
            assert_eq!(appliance.appliance_id, source.device_id);
        }
    }

    #[test]
    fn reachability_requires_exact_true() {
        let config = SkillConfig::default();
        for (online, expected) in [("True", true), ("true", false), ("False", false), ("", false)]
        {
            let appliance = describe(&garage("D1", online), &config).unwrap();
            assert_eq!(appliance.is_reachable, expected, "online = {online:?}");
        }

        let no_online = device("D2", 17, &[("desc", "Garage 2"), ("name", "LMxxx")]);
        assert!(!describe(&no_online, &config).unwrap().is_reachable);
    }

    #[test]
    fn missing_desc_is_an_error() {
        let devices = vec![garage("D1", "True"), device("D2", 17, &[("name", "LMxxx")])];

        let result = discover(&devices, &SkillConfig::default());
        assert!(matches!(
            result,
            Err(SkillError::AttributeNotFound { attribute: "desc", ref device_id })
                if device_id.as_str() == "D2"
        ));
    }

    #[test]
    fn missing_name_is_an_error() {
        let source = device("D1", 17, &[("desc", "Garage 1"), ("online", "True")]);
        let result = describe(&source, &SkillConfig::default());
        assert!(matches!(
            result,
            Err(SkillError::AttributeNotFound {
                attribute: "name",
                ..
            })
        ));
    }

    #[test]
    fn unrecognized_device_without_attributes_is_ignored() {
        let devices = vec![device("hub", 1, &[])];
        assert!(discover(&devices, &SkillConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn custom_allow_set() {
        let config = SkillConfig {
            recognized_device_types: vec![17, 5],
            ..SkillConfig::default()
        };
        let devices = vec![
            garage("D1", "True"),
            device("D5", 5, &[("desc", "Gate"), ("name", "LA400")]),
        ];
        assert_eq!(discover(&devices, &config).unwrap().len(), 2);
    }
}
