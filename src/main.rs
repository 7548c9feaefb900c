use std::time::Duration;

use fairway_planner::clubs::catalog::{Catalog, CatalogEntry};
use fairway_planner::clubs::selector::select;
use fairway_planner::course::{builtin_presets, find_preset};
use fairway_planner::geo::metric::distance;
use fairway_planner::planner::{Course, ShotPlanner};
use fairway_planner::Point;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

/// Upper bound on one planning run, graph build included.
const PLAN_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EngineRequest {
    Plan {
        course: Course,
    },
    Distance {
        from: Point,
        to: Point,
    },
    SelectClub {
        distance: f64,
        #[serde(default)]
        first_shot: bool,
        /// Preset whose bag to use; a custom catalog takes precedence.
        #[serde(default)]
        preset: Option<String>,
        #[serde(default)]
        catalog: Option<Catalog>,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EngineResponse {
    Plan {
        found: bool,
        path: Vec<Point>,
        shots: Vec<ShotResult>,
        total_distance: f64,
    },
    Distance {
        meters: f64,
    },
    SelectClub {
        club: CatalogEntry,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Serialize)]
struct ShotResult {
    start: Point,
    end: Point,
    club: String,
    distance: f64,
}

async fn plan(course: Course) -> EngineResponse {
    let job = tokio::task::spawn_blocking(move || ShotPlanner::new().plan(&course));
    let outcome = match tokio::time::timeout(PLAN_TIMEOUT, job).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_err)) => {
            return EngineResponse::Error {
                message: format!("planner task failed: {join_err}"),
            }
        }
        Err(_) => {
            return EngineResponse::Error {
                message: format!("planning exceeded {}s", PLAN_TIMEOUT.as_secs()),
            }
        }
    };

    match outcome {
        Ok(plan) => {
            let total_distance = plan.total_distance();
            let found = plan.found();
            let shots = plan
                .segments
                .into_iter()
                .map(|s| ShotResult {
                    start: s.start,
                    end: s.end,
                    club: s.club.name,
                    distance: s.length,
                })
                .collect();
            EngineResponse::Plan {
                found,
                path: plan.path,
                shots,
                total_distance,
            }
        }
        Err(err) => EngineResponse::Error {
            message: err.to_string(),
        },
    }
}

async fn handler(event: LambdaEvent<EngineRequest>) -> Result<EngineResponse, Error> {
    let req = event.payload;
    match req {
        EngineRequest::Plan { course } => Ok(plan(course).await),
        EngineRequest::Distance { from, to } => Ok(EngineResponse::Distance {
            meters: distance(from, to),
        }),
        EngineRequest::SelectClub {
            distance: meters,
            first_shot,
            preset,
            catalog,
        } => {
            let catalog = match (catalog, preset) {
                (Some(catalog), _) => catalog,
                (None, Some(name)) => match find_preset(builtin_presets(), &name) {
                    Ok(preset) => preset.catalog.clone(),
                    Err(err) => {
                        return Ok(EngineResponse::Error {
                            message: err.to_string(),
                        })
                    }
                },
                (None, None) => Catalog::bethemont(),
            };
            let club = select(meters, first_shot, &catalog).clone();
            Ok(EngineResponse::SelectClub { club })
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let func = service_fn(handler);
    lambda_runtime::run(func).await
}
