pub mod live_data;
