//! In-memory stand-ins for the two upstream services.

use crate::domain::model::{Address, AddressLookup, GeoPoint, NormalizedPostalCode};
use crate::domain::ports::{AddressService, GeocodingService};
use crate::utils::error::{GeocodeError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum AddressAnswer {
    Found(Address),
    NotFound,
    Fail,
}

pub fn address(street: &str, city: &str, region: &str) -> Address {
    Address {
        street: street.to_string(),
        city: city.to_string(),
        region: region.to_string(),
    }
}

pub fn point(lat: &str, lon: &str) -> GeoPoint {
    GeoPoint {
        lat: lat.to_string(),
        lon: lon.to_string(),
    }
}

/// Answers by 8-digit code; codes without an entry fail like an unreachable service.
#[derive(Default)]
pub struct StubAddressService {
    answers: HashMap<String, AddressAnswer>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl StubAddressService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, digits: &str, answer: AddressAnswer) -> Self {
        self.answers.insert(digits.to_string(), answer);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressService for StubAddressService {
    async fn lookup(&self, postal_code: &NormalizedPostalCode) -> Result<AddressLookup> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push(postal_code.digits().to_string());

        match self.answers.get(postal_code.digits()) {
            Some(AddressAnswer::Found(address)) => Ok(AddressLookup::Found(address.clone())),
            Some(AddressAnswer::NotFound) => Ok(AddressLookup::NotFound),
            Some(AddressAnswer::Fail) | None => Err(GeocodeError::UpstreamStatusError {
                service: "stub address service".to_string(),
                status: 503,
            }),
        }
    }
}

pub struct StubGeocoder {
    points: Option<Vec<GeoPoint>>,
    calls: AtomicUsize,
    queries: Mutex<Vec<(String, usize)>>,
}

impl StubGeocoder {
    pub fn returning(points: Vec<GeoPoint>) -> Self {
        Self {
            points: Some(points),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            points: None,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeocodingService for StubGeocoder {
    async fn search(&self, address: &str, max_results: usize) -> Result<Vec<GeoPoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap()
            .push((address.to_string(), max_results));

        match &self.points {
            Some(points) => Ok(points.iter().take(max_results).cloned().collect()),
            None => Err(GeocodeError::UpstreamStatusError {
                service: "stub geocoder".to_string(),
                status: 500,
            }),
        }
    }
}
