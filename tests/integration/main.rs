mod app_flow;
mod helpers;
mod window_scenarios;
