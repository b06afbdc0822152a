//! Single binary web server: JSON API over the tournament library.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Set DATA_DIR to keep each tournament on disk under DATA_DIR/<id>/.

use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use cricket_tournament_web::{
    generate_round_robin, save_match_result, save_playoff_result, standings, standings_csv,
    start_playoffs, FileStorage, ResultEntry, StoreError, Tournament, TournamentError,
    TournamentId, TournamentStore,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

impl TournamentEntry {
    fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            last_activity: Instant::now(),
        }
    }
}

/// In-memory tournaments by ID. Entries are evicted after 12h inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are dropped from memory.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Where tournaments are persisted, if anywhere.
struct ServerConfig {
    data_dir: Option<PathBuf>,
}

impl ServerConfig {
    fn store(&self, id: TournamentId) -> Option<TournamentStore<FileStorage>> {
        let dir = self.data_dir.as_ref()?.join(id.to_string());
        Some(TournamentStore::new(FileStorage::new(dir)))
    }

    /// Tournament previously saved to disk (e.g. evicted or from an earlier run).
    fn load(&self, id: TournamentId) -> Option<Tournament> {
        let store = self.store(id)?;
        if !store.storage().dir().is_dir() {
            return None;
        }
        match store.load_tournament(id) {
            Ok(t) => Some(t),
            Err(e) => {
                log::error!("Failed to load tournament {}: {}", id, e);
                None
            }
        }
    }

    fn save(&self, tournament: &Tournament) -> Result<(), StoreError> {
        match self.store(tournament.id) {
            Some(mut store) => store.save_tournament(tournament),
            None => Ok(()),
        }
    }
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
    #[serde(default)]
    logo: Option<String>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and team name (e.g. /api/tournaments/{id}/teams/{name})
#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    name: String,
}

/// Path segments: tournament id and match index (e.g. /api/tournaments/{id}/matches/{index})
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    index: usize,
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::InvalidIndex(_) | TournamentError::TeamNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// A copy of the tournament, reloaded from disk if it was evicted. Refreshes its activity time.
/// Disk reads run on the blocking pool, never under the lock.
async fn fetch_tournament(
    state: &AppState,
    config: &Data<ServerConfig>,
    id: TournamentId,
) -> Result<Tournament, HttpResponse> {
    {
        let mut g = state.write().map_err(|_| lock_error())?;
        if let Some(entry) = g.get_mut(&id) {
            entry.last_activity = Instant::now();
            return Ok(entry.tournament.clone());
        }
    }
    let disk = config.clone();
    let loaded = web::block(move || disk.load(id)).await.map_err(|e| {
        log::error!("Failed to load tournament {}: {}", id, e);
        HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
    })?;
    let Some(tournament) = loaded else {
        return Err(no_tournament());
    };
    let mut g = state.write().map_err(|_| lock_error())?;
    let entry = g.entry(id).or_insert_with(|| {
        log::info!("Loaded tournament {} from disk", id);
        TournamentEntry::new(tournament)
    });
    entry.last_activity = Instant::now();
    Ok(entry.tournament.clone())
}

/// Write the tournament to disk on the blocking pool, handing it back once saved.
async fn persist(config: &Data<ServerConfig>, tournament: Tournament) -> Result<Tournament, HttpResponse> {
    let id = tournament.id;
    let disk = config.clone();
    let saved = match web::block(move || disk.save(&tournament).map(|()| tournament)).await {
        Ok(saved) => saved.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    saved.map_err(|e| {
        log::error!("Failed to save tournament {}: {}", id, e);
        HttpResponse::InternalServerError().json(serde_json::json!({ "error": e }))
    })
}

/// Render a copy of the tournament.
async fn view_tournament<F>(state: &AppState, config: &Data<ServerConfig>, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&Tournament) -> HttpResponse,
{
    match fetch_tournament(state, config, id).await {
        Ok(t) => f(&t),
        Err(response) => response,
    }
}

/// Apply an operation to a copy, persist it, and only then replace the in-memory tournament.
/// A failed operation or save leaves the held tournament as it was.
async fn update_tournament<F>(state: &AppState, config: &Data<ServerConfig>, id: TournamentId, op: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut t = match fetch_tournament(state, config, id).await {
        Ok(t) => t,
        Err(response) => return response,
    };
    if let Err(e) = op(&mut t) {
        return error_response(&e);
    }
    let t = match persist(config, t).await {
        Ok(t) => t,
        Err(response) => return response,
    };
    let response = HttpResponse::Ok().json(&t);
    match state.write() {
        Ok(mut g) => {
            g.insert(id, TournamentEntry::new(t));
            response
        }
        Err(_) => lock_error(),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "cricket-tournament-web",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, config: Data<ServerConfig>) -> HttpResponse {
    let tournament = match persist(&config, Tournament::new()).await {
        Ok(t) => t,
        Err(response) => return response,
    };
    let response = HttpResponse::Ok().json(&tournament);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    log::info!("Created tournament {}", tournament.id);
    g.insert(tournament.id, TournamentEntry::new(tournament));
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, config: Data<ServerConfig>, path: Path<TournamentPath>) -> HttpResponse {
    view_tournament(&state, &config, path.id, |t| HttpResponse::Ok().json(t)).await
}

/// Team, match, completed and upcoming counts.
#[get("/api/tournaments/{id}/summary")]
async fn api_get_summary(state: AppState, config: Data<ServerConfig>, path: Path<TournamentPath>) -> HttpResponse {
    view_tournament(&state, &config, path.id, |t| HttpResponse::Ok().json(t.summary())).await
}

#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(
    state: AppState,
    config: Data<ServerConfig>,
    path: Path<TournamentPath>,
    body: Json<AddTeamBody>,
) -> HttpResponse {
    let AddTeamBody { name, logo } = body.into_inner();
    update_tournament(&state, &config, path.id, |t| t.add_team(name, logo)).await
}

/// Remove a team and its league matches.
#[delete("/api/tournaments/{id}/teams/{name}")]
async fn api_remove_team(state: AppState, config: Data<ServerConfig>, path: Path<TournamentTeamPath>) -> HttpResponse {
    update_tournament(&state, &config, path.id, |t| t.remove_team(&path.name)).await
}

/// Clear teams, matches and playoffs.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset(state: AppState, config: Data<ServerConfig>, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, &config, path.id, |t| {
        t.reset();
        Ok(())
    }).await
}

/// Generate the round robin, overwriting any existing schedule.
#[post("/api/tournaments/{id}/schedule")]
async fn api_generate_schedule(state: AppState, config: Data<ServerConfig>, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, &config, path.id, generate_round_robin).await
}

/// Save venue/time/scores for a league match.
#[put("/api/tournaments/{id}/matches/{index}")]
async fn api_save_match(
    state: AppState,
    config: Data<ServerConfig>,
    path: Path<TournamentMatchPath>,
    body: Json<ResultEntry>,
) -> HttpResponse {
    update_tournament(&state, &config, path.id, |t| save_match_result(t, path.index, &body)).await
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, config: Data<ServerConfig>, path: Path<TournamentPath>) -> HttpResponse {
    view_tournament(&state, &config, path.id, |t| HttpResponse::Ok().json(standings(t))).await
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, config: Data<ServerConfig>, path: Path<TournamentPath>) -> HttpResponse {
    view_tournament(&state, &config, path.id, |t| match standings_csv(&standings(t)) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(body),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }).await
}

/// Seed playoffs from the current top four, replacing any existing bracket.
#[post("/api/tournaments/{id}/playoffs")]
async fn api_generate_playoffs(state: AppState, config: Data<ServerConfig>, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, &config, path.id, start_playoffs).await
}

/// Save venue/time/scores for a bracket match (0 = Semi 1, 1 = Semi 2, 2 = Final).
#[put("/api/tournaments/{id}/playoffs/{index}")]
async fn api_save_playoff(
    state: AppState,
    config: Data<ServerConfig>,
    path: Path<TournamentMatchPath>,
    body: Json<ResultEntry>,
) -> HttpResponse {
    update_tournament(&state, &config, path.id, |t| save_playoff_result(t, path.index, &body)).await
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let data_dir = std::env::var_os("DATA_DIR").map(PathBuf::from);
    match &data_dir {
        Some(dir) => log::info!("Persisting tournaments under {}", dir.display()),
        None => log::info!("DATA_DIR not set; tournaments are kept in memory only"),
    }
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
    let config = Data::new(ServerConfig { data_dir });

    // Background task: every 30 minutes, drop tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Evicted {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_get_summary)
            .service(api_add_team)
            .service(api_remove_team)
            .service(api_reset)
            .service(api_generate_schedule)
            .service(api_save_match)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_generate_playoffs)
            .service(api_save_playoff)
    })
    .bind(bind)?
    .run()
    .await
}
