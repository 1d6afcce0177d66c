use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

#[derive(Serialize, Deserialize)]
pub struct StatusDto {
    pub status: String,
    pub uptime_seconds: u64,
}

#[derive(Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub timestamp: String,
}
