//! HTTP handler functions for the wildguard API.
//!
//! Every data endpoint is one dashboard panel: it fetches its upstream
//! snapshot, runs the shared pipeline, and answers with either the
//! chart-ready payload or a scoped JSON error body. No upstream failure
//! escapes its panel.

use actix_web::{HttpResponse, web};
use chrono::Datelike;
use wildguard_analytics::{build_timeline, metric_trend, summarize, utilization_by_district};
use wildguard_analytics_models::PeriodFilter;
use wildguard_api::{ApiError, ConflictFilter, WeatherQuery};
use wildguard_conflict_models::{AttackEvent, DamageClass, SpeciesOption, map_damage_class};
use wildguard_cultivation_models::CropMetric;
use wildguard_geography::join_counts;
use wildguard_server_models::{
    ApiErrorBody, ApiHealth, ApiSession, ConflictQueryParams, LoginRequest, TimelineQueryParams,
    TrendQueryParams, UtilizationQueryParams,
};

use crate::AppState;

/// Logs an upstream failure and answers with the panel's scoped error
/// body.
fn panel_error(panel: &str, e: &ApiError) -> HttpResponse {
    log::error!("{panel} panel upstream failure: {e}");
    HttpResponse::BadGateway().json(ApiErrorBody {
        error: format!("{panel} data is unavailable right now"),
    })
}

/// Parses the comma-separated filter params into a [`ConflictFilter`].
///
/// Unparseable IDs and unrecognized class names are dropped silently;
/// a partially valid filter still narrows the data.
fn parse_filter(params: &ConflictQueryParams) -> ConflictFilter {
    let species_ids: Vec<i64> = params
        .species_ids
        .as_deref()
        .map(|s| s.split(',').filter_map(|v| v.trim().parse().ok()).collect())
        .unwrap_or_default();

    let damage_classes: Vec<DamageClass> = params
        .damage_classes
        .as_deref()
        .map(|s| {
            s.split(',')
                .filter_map(|c| {
                    let c = c.trim();
                    c.parse().ok().or_else(|| map_damage_class(c))
                })
                .collect()
        })
        .unwrap_or_default();

    ConflictFilter {
        species_ids,
        damage_classes,
        start_date: params.start_date,
        end_date: params.end_date,
    }
}

/// Returns the species options, preferring the panel cache and
/// refreshing it through the stale-response guard otherwise.
async fn species_options(state: &AppState) -> Result<Vec<SpeciesOption>, ApiError> {
    if let Some(cached) = state.species_panel.get() {
        return Ok(cached);
    }
    let tag = state.species_panel.begin();
    let species = state.client.filter_options().await?;
    state.species_panel.complete(tag, species.clone());
    Ok(species)
}

/// Fetches the filtered incident window, resolving species IDs only
/// when the filter actually selects species.
async fn fetch_filtered_events(
    state: &AppState,
    params: &ConflictQueryParams,
) -> Result<Vec<AttackEvent>, ApiError> {
    let filter = parse_filter(params);
    let options = if filter.species_ids.is_empty() {
        Vec::new()
    } else {
        species_options(state).await?
    };
    state.client.filtered_events(&filter, &options).await
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/filter-options`
///
/// Refreshes the species cache from upstream; on failure, serves the
/// last good options rather than an empty filter bar.
pub async fn filter_options(state: web::Data<AppState>) -> HttpResponse {
    let tag = state.species_panel.begin();
    match state.client.filter_options().await {
        Ok(species) => {
            state.species_panel.complete(tag, species.clone());
            HttpResponse::Ok().json(species)
        }
        Err(e) => {
            log::error!("filter-options upstream failure: {e}");
            state.species_panel.get().map_or_else(
                || panel_error("filter options", &e),
                |cached| HttpResponse::Ok().json(cached),
            )
        }
    }
}

/// `GET /api/summary`
pub async fn summary(
    state: web::Data<AppState>,
    params: web::Query<ConflictQueryParams>,
) -> HttpResponse {
    match fetch_filtered_events(&state, &params).await {
        Ok(events) => HttpResponse::Ok().json(summarize(&events)),
        Err(e) => panel_error("summary", &e),
    }
}

/// Resolves the calendar scope from the timeline params.
fn parse_period(params: &TimelineQueryParams) -> PeriodFilter {
    let fallback_year = || chrono::Utc::now().year();
    match params.mode.as_deref() {
        Some("year") => PeriodFilter::Year {
            year: params.year.unwrap_or_else(fallback_year),
        },
        Some("month") => PeriodFilter::Month {
            year: params.year.unwrap_or_else(fallback_year),
            month: params.month.unwrap_or(1).clamp(1, 12),
        },
        _ => PeriodFilter::All,
    }
}

/// `GET /api/timeline`
pub async fn timeline(
    state: web::Data<AppState>,
    params: web::Query<TimelineQueryParams>,
) -> HttpResponse {
    let period = parse_period(&params);
    let filter_params = ConflictQueryParams {
        species_ids: params.species_ids.clone(),
        damage_classes: params.damage_classes.clone(),
        start_date: params.start_date,
        end_date: params.end_date,
    };

    match fetch_filtered_events(&state, &filter_params).await {
        Ok(events) => HttpResponse::Ok().json(build_timeline(&events, period)),
        Err(e) => panel_error("timeline", &e),
    }
}

/// `GET /api/damage-breakdown`
///
/// Passthrough of the upstream's own class/count map, which the pie
/// panel consumes as-is.
pub async fn damage_breakdown(
    state: web::Data<AppState>,
    params: web::Query<ConflictQueryParams>,
) -> HttpResponse {
    let filter = parse_filter(&params);
    let options = if filter.species_ids.is_empty() {
        Vec::new()
    } else {
        match species_options(&state).await {
            Ok(options) => options,
            Err(e) => return panel_error("damage breakdown", &e),
        }
    };

    match state.client.damage_breakdown(&filter, &options).await {
        Ok(breakdown) => HttpResponse::Ok().json(breakdown),
        Err(e) => panel_error("damage breakdown", &e),
    }
}

/// `GET /api/choropleth`
pub async fn choropleth(
    state: web::Data<AppState>,
    params: web::Query<ConflictQueryParams>,
) -> HttpResponse {
    let Some(regions) = state.regions.as_ref() else {
        return HttpResponse::ServiceUnavailable().json(ApiErrorBody {
            error: "region boundaries are not loaded".to_string(),
        });
    };

    let filter = parse_filter(&params);
    let options = if filter.species_ids.is_empty() {
        Vec::new()
    } else {
        match species_options(&state).await {
            Ok(options) => options,
            Err(e) => return panel_error("choropleth", &e),
        }
    };

    match state.client.village_counts(&filter, &options).await {
        Ok(counts) => HttpResponse::Ok().json(join_counts(regions, &counts)),
        Err(e) => panel_error("choropleth", &e),
    }
}

/// `GET /api/utilization`
pub async fn utilization(
    state: web::Data<AppState>,
    params: web::Query<UtilizationQueryParams>,
) -> HttpResponse {
    match state.client.cultivation_table().await {
        Ok(table) => HttpResponse::Ok().json(utilization_by_district(&table, &params.year)),
        Err(e) => panel_error("utilization", &e),
    }
}

/// `GET /api/trend`
///
/// Defaults mirror the dashboard's first view: the first district, its
/// first crop, and total cultivated area.
pub async fn trend(
    state: web::Data<AppState>,
    params: web::Query<TrendQueryParams>,
) -> HttpResponse {
    let table = match state.client.cultivation_table().await {
        Ok(table) => table,
        Err(e) => return panel_error("trend", &e),
    };

    let districts: Vec<String> = params.districts.as_deref().map_or_else(
        || {
            table
                .districts()
                .first()
                .map(|d| vec![(*d).to_string()])
                .unwrap_or_default()
        },
        |s| s.split(',').map(|d| d.trim().to_string()).collect(),
    );

    let crops: Vec<String> = params.crops.as_deref().map_or_else(
        || {
            table
                .crops_for(&districts)
                .first()
                .map(|c| vec![(*c).to_string()])
                .unwrap_or_default()
        },
        |s| s.split(',').map(|c| c.trim().to_string()).collect(),
    );

    let metric = params
        .metric
        .as_deref()
        .and_then(|label| label.trim().parse::<CropMetric>().ok())
        .unwrap_or(CropMetric::TotalCultivatedArea);

    HttpResponse::Ok().json(metric_trend(&table, &districts, &crops, metric))
}

/// `GET /api/predictions`
pub async fn predictions(state: web::Data<AppState>) -> HttpResponse {
    match state.client.predictions().await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => panel_error("predictions", &e),
    }
}

/// `POST /api/predict`
pub async fn predict(
    state: web::Data<AppState>,
    body: web::Json<WeatherQuery>,
) -> HttpResponse {
    match state.client.request_prediction(&body).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => panel_error("prediction", &e),
    }
}

/// `POST /api/login`
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> HttpResponse {
    match state.sessions.login(&body.email, &body.password) {
        Ok(session) => HttpResponse::Ok().json(ApiSession::from(session)),
        Err(e) => {
            log::warn!("login rejected for {}: {e}", body.email);
            HttpResponse::Unauthorized().json(ApiErrorBody {
                error: "invalid credentials".to_string(),
            })
        }
    }
}

/// `POST /api/logout`
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    state.sessions.logout();
    HttpResponse::NoContent().finish()
}

/// `GET /api/session`
pub async fn session(state: web::Data<AppState>) -> HttpResponse {
    state.sessions.current().map_or_else(
        || {
            HttpResponse::Unauthorized().json(ApiErrorBody {
                error: "no active session".to_string(),
            })
        },
        |session| HttpResponse::Ok().json(ApiSession::from(session)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_filters() {
        let params = ConflictQueryParams {
            species_ids: Some("1, 2,junk".to_string()),
            damage_classes: Some("Crop,Tree Damage,unknown".to_string()),
            start_date: None,
            end_date: None,
        };
        let filter = parse_filter(&params);
        assert_eq!(filter.species_ids, vec![1, 2]);
        // "Crop" parses exactly; "Tree Damage" falls back to the keyword
        // normalizer; "unknown" is dropped.
        assert_eq!(
            filter.damage_classes,
            vec![DamageClass::Crop, DamageClass::Crop]
        );
    }

    #[test]
    fn parses_timeline_modes() {
        let year = TimelineQueryParams {
            mode: Some("year".to_string()),
            year: Some(2024),
            ..TimelineQueryParams::default()
        };
        assert_eq!(parse_period(&year), PeriodFilter::Year { year: 2024 });

        let month = TimelineQueryParams {
            mode: Some("month".to_string()),
            year: Some(2024),
            month: Some(15),
            ..TimelineQueryParams::default()
        };
        assert_eq!(
            parse_period(&month),
            PeriodFilter::Month { year: 2024, month: 12 }
        );

        let all = TimelineQueryParams::default();
        assert_eq!(parse_period(&all), PeriodFilter::All);
    }
}
