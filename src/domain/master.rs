use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One scraped master profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterRecord {
    pub id: String,
    pub url: String,
    pub name: String,
    pub position: String,
    pub car_brands: String,
    pub city: String,
    pub district: String,
    pub rating: Option<f32>,
    pub votes: u32,
    pub experience_years: Option<u32>,
    pub views: u32,
    pub date_added: Option<String>,
    pub address: String,
    pub description: String,
    pub phone_numbers: Vec<String>,
    pub services: Vec<Service>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub position: String,
    pub car: String,
}

/// What a listing page tells us about one master before visiting the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRef {
    pub id: Option<String>,
    pub url: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("profile at {url} has no master id")]
pub struct MalformedRecord {
    pub url: String,
}

impl MasterRecord {
    pub fn with_phone_numbers(self, phone_numbers: Vec<String>) -> Self {
        Self {
            phone_numbers,
            ..self
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "(unnamed)"
        } else {
            &self.name
        }
    }
}

/// Collects independently extracted profile fields and assembles the record
/// once every extraction has run.
#[derive(Debug, Default)]
pub struct MasterRecordBuilder {
    id: Option<String>,
    url: String,
    name: Option<String>,
    position: Option<String>,
    car_brands: Option<String>,
    location: Option<String>,
    rating: Option<f32>,
    votes: Option<u32>,
    experience_years: Option<u32>,
    views: Option<u32>,
    date_added: Option<String>,
    address: Option<String>,
    description: Option<String>,
    services: Vec<Service>,
    images: Vec<String>,
}

impl MasterRecordBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: Option<String>) -> Self {
        self.id = id.filter(|v| !v.trim().is_empty()).or(self.id);
        self
    }

    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn position(mut self, position: Option<String>) -> Self {
        self.position = position;
        self
    }

    pub fn car_brands(mut self, car_brands: Option<String>) -> Self {
        self.car_brands = car_brands;
        self
    }

    /// Location as shown on the site, e.g. `Bakı, Nəsimi r.`
    pub fn location(mut self, location: Option<String>) -> Self {
        self.location = location.filter(|v| !v.is_empty()).or(self.location);
        self
    }

    pub fn rating(mut self, rating: Option<f32>) -> Self {
        self.rating = rating.filter(|r| (0.0..=5.0).contains(r));
        self
    }

    pub fn votes(mut self, votes: Option<u32>) -> Self {
        self.votes = votes;
        self
    }

    pub fn experience_years(mut self, years: Option<u32>) -> Self {
        self.experience_years = years;
        self
    }

    pub fn views(mut self, views: Option<u32>) -> Self {
        self.views = views;
        self
    }

    pub fn date_added(mut self, date_added: Option<String>) -> Self {
        self.date_added = date_added.filter(|v| !v.is_empty());
        self
    }

    pub fn address(mut self, address: Option<String>) -> Self {
        self.address = address;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn services(mut self, services: Vec<Service>) -> Self {
        self.services = services;
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn build(self) -> Result<MasterRecord, MalformedRecord> {
        let Some(id) = self.id else {
            return Err(MalformedRecord { url: self.url });
        };

        let (city, district) = split_location(self.location.as_deref().unwrap_or_default());

        Ok(MasterRecord {
            id,
            url: self.url,
            name: self.name.unwrap_or_default(),
            position: self.position.unwrap_or_default(),
            car_brands: self.car_brands.unwrap_or_default(),
            city,
            district,
            rating: self.rating,
            votes: self.votes.unwrap_or_default(),
            experience_years: self.experience_years,
            views: self.views.unwrap_or_default(),
            date_added: self.date_added,
            address: self.address.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            phone_numbers: Vec::new(),
            services: self.services,
            images: self.images,
        })
    }
}

/// Split `"City, District"` at the first comma.
fn split_location(location: &str) -> (String, String) {
    match location.split_once(',') {
        Some((city, district)) => (city.trim().to_string(), district.trim().to_string()),
        None => (location.trim().to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_id() {
        let result = MasterRecordBuilder::new("https://avtotemir.az/usta/x")
            .name(Some("Elvin".into()))
            .build();

        assert_eq!(
            result,
            Err(MalformedRecord {
                url: "https://avtotemir.az/usta/x".into()
            })
        );
    }

    #[test]
    fn test_blank_id_is_not_an_identity() {
        let result = MasterRecordBuilder::new("u").id(Some("  ".into())).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_later_missing_id_keeps_earlier_one() {
        let record = MasterRecordBuilder::new("u")
            .id(Some("42".into()))
            .id(None)
            .build()
            .unwrap();
        assert_eq!(record.id, "42");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let record = MasterRecordBuilder::new("u").id(Some("1".into())).build().unwrap();

        assert_eq!(record.name, "");
        assert_eq!(record.rating, None);
        assert_eq!(record.votes, 0);
        assert_eq!(record.views, 0);
        assert_eq!(record.experience_years, None);
        assert_eq!(record.date_added, None);
        assert!(record.phone_numbers.is_empty());
        assert!(record.services.is_empty());
        assert_eq!(record.display_name(), "(unnamed)");
    }

    #[test]
    fn test_location_splits_into_city_and_district() {
        let record = MasterRecordBuilder::new("u")
            .id(Some("1".into()))
            .location(Some("Bakı, Nəsimi r.".into()))
            .build()
            .unwrap();

        assert_eq!(record.city, "Bakı");
        assert_eq!(record.district, "Nəsimi r.");
    }

    #[test]
    fn test_empty_location_keeps_fallback() {
        let record = MasterRecordBuilder::new("u")
            .id(Some("1".into()))
            .location(Some("Sumqayıt".into()))
            .location(Some(String::new()))
            .build()
            .unwrap();

        assert_eq!(record.city, "Sumqayıt");
        assert_eq!(record.district, "");
    }

    #[test]
    fn test_out_of_range_rating_is_dropped() {
        let record = MasterRecordBuilder::new("u")
            .id(Some("1".into()))
            .rating(Some(7.5))
            .build()
            .unwrap();
        assert_eq!(record.rating, None);
    }

    #[test]
    fn test_with_phone_numbers() {
        let record = MasterRecordBuilder::new("u")
            .id(Some("1".into()))
            .build()
            .unwrap()
            .with_phone_numbers(vec!["051 605-04-44".into()]);

        assert_eq!(record.phone_numbers, vec!["051 605-04-44"]);
    }
}
