use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleApplicationId(pub String);

impl VehicleApplicationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Owner details embedded in a vehicle application. The gateway populates the
/// `ownerId` reference with the owner record itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleOwner {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl VehicleOwner {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLocation {
    #[serde(default)]
    pub city: String,
}

/// A vehicle listing application awaiting review. Older gateway records use
/// `photos` instead of `images`; both decode into `images`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleApplication {
    #[serde(rename = "_id")]
    pub id: VehicleApplicationId,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub license_plate: String,
    pub vehicle_type: String,
    pub seating_capacity: u8,
    pub fuel_type: String,
    #[serde(default)]
    pub location: VehicleLocation,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "photos")]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(rename = "ownerId")]
    pub owner: VehicleOwner,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VehicleApplication {
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::VehicleApplication;

    fn raw_application(images_key: &str) -> String {
        format!(
            r#"{{
                "_id": "veh-31",
                "make": "Hyundai",
                "model": "Elantra",
                "year": 2022,
                "licensePlate": "GGE-204-KJ",
                "vehicleType": "sedan",
                "seatingCapacity": 5,
                "fuelType": "petrol",
                "location": {{ "city": "Accra" }},
                "description": "Clean daily driver",
                "{images_key}": ["https://cdn.example.com/veh-31/front.jpg"],
                "features": ["Bluetooth", "Reverse camera"],
                "ownerId": {{
                    "firstName": "Kwame",
                    "lastName": "Mensah",
                    "email": "kwame@example.com",
                    "phone": "+233501234567",
                    "createdAt": "2025-11-02T10:00:00Z"
                }},
                "createdAt": "2026-04-01T09:15:00Z",
                "updatedAt": "2026-04-01T09:15:00Z"
            }}"#
        )
    }

    #[test]
    fn vehicle_application_decodes_wire_shape() {
        let application: VehicleApplication =
            serde_json::from_str(&raw_application("images")).expect("wire shape should decode");
        assert_eq!(application.display_name(), "2022 Hyundai Elantra");
        assert_eq!(application.owner.full_name(), "Kwame Mensah");
        assert_eq!(application.location.city, "Accra");
        assert_eq!(application.images.len(), 1);
    }

    #[test]
    fn legacy_photos_key_decodes_into_images() {
        let application: VehicleApplication =
            serde_json::from_str(&raw_application("photos")).expect("legacy shape should decode");
        assert_eq!(application.images.len(), 1);
    }

    #[test]
    fn missing_optional_collections_default_to_empty() {
        let raw = r#"{
            "_id": "veh-9",
            "make": "Kia",
            "model": "Rio",
            "year": 2019,
            "licensePlate": "LND-88-AA",
            "vehicleType": "hatchback",
            "seatingCapacity": 5,
            "fuelType": "petrol",
            "ownerId": {
                "firstName": "Ama",
                "lastName": "Owusu",
                "email": "ama@example.com",
                "phone": "+233207654321",
                "createdAt": "2025-09-20T12:00:00Z"
            },
            "createdAt": "2026-04-02T16:40:00Z",
            "updatedAt": "2026-04-03T08:00:00Z"
        }"#;

        let application: VehicleApplication =
            serde_json::from_str(raw).expect("sparse shape should decode");
        assert!(application.images.is_empty());
        assert!(application.features.is_empty());
        assert!(application.description.is_empty());
        assert!(application.location.city.is_empty());
    }
}
