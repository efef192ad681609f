pub mod geocode;
pub mod open_meteo;
pub mod recommend;
pub mod weather;
