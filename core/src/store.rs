//! SQLite persistence layer: the data source and sink around the engine.
//!
//! RULE: Only store.rs talks to the database.
//! The engine never touches the store; callers load a snapshot,
//! run a forecast, then hand the predictions back here.

use crate::{
    engine::Forecast,
    error::{SimError, SimResult},
    prediction::PredictionRow,
    snapshot::TournamentSnapshot,
    types::{Fixture, FixtureStatus, Stage, StandingRow, TeamRef, TeamStanding},
};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;

pub struct SimStore {
    conn: Connection,
}

/// Predictions as last persisted, with the time they were written.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPredictions {
    pub predictions: Vec<PredictionRow>,
    pub updated_at:  String,
}

impl SimStore {
    /// Open (or create) the forecast database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Inputs ─────────────────────────────────────────────────

    pub fn insert_team(&self, team: &TeamRef) -> SimResult<()> {
        insert_team(&self.conn, team)
    }

    pub fn upsert_standing(&self, standing: &TeamStanding) -> SimResult<()> {
        upsert_standing(&self.conn, standing)
    }

    pub fn insert_fixture(&self, fixture: &Fixture) -> SimResult<()> {
        insert_fixture(&self.conn, fixture)
    }

    /// Write a whole snapshot in one transaction.
    ///
    /// Rows the engine would drop are skipped here too: a team id already
    /// stored, and standings or fixtures naming a team that is not in the
    /// roster. Each skip is logged; none fails the import.
    pub fn import_snapshot(&mut self, snapshot: &TournamentSnapshot) -> SimResult<()> {
        let tx = self.conn.transaction()?;
        let mut known: HashSet<String> = {
            let mut stmt = tx.prepare("SELECT team_id FROM team")?;
            let ids = stmt.query_map([], |row| row.get(0))?.collect::<Result<_, _>>()?;
            ids
        };

        for team in &snapshot.teams {
            if !known.insert(team.id.clone()) {
                log::warn!("import: duplicate team id '{}' skipped", team.id);
                continue;
            }
            insert_team(&tx, team)?;
        }
        for standing in &snapshot.standings {
            if !known.contains(&standing.team_id) {
                log::warn!("import: standing for unknown team '{}' skipped", standing.team_id);
                continue;
            }
            upsert_standing(&tx, standing)?;
        }
        for fixture in &snapshot.fixtures {
            if !known.contains(&fixture.home_team_id) || !known.contains(&fixture.away_team_id) {
                log::warn!(
                    "import: fixture {} vs {} names an unknown team, skipped",
                    fixture.home_team_id, fixture.away_team_id
                );
                continue;
            }
            insert_fixture(&tx, fixture)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn load_snapshot(&self) -> SimResult<TournamentSnapshot> {
        let mut stmt = self.conn.prepare(
            "SELECT team_id, name, short_code, grp FROM team ORDER BY rowid ASC"
        )?;
        let teams = stmt.query_map([], |row| {
            Ok(TeamRef {
                id:         row.get(0)?,
                name:       row.get(1)?,
                short_code: row.get(2)?,
                group:      row.get(3)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT team_id, grp, stage, played, won, lost, tied, no_result, points, net_rate, position
             FROM standing ORDER BY rowid ASC"
        )?;
        let raw_standings = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(2)?,
                TeamStanding {
                    team_id: row.get(0)?,
                    group:   row.get(1)?,
                    stage:   Stage::FirstPhase,
                    row:     StandingRow {
                        played:    row.get(3)?,
                        won:       row.get(4)?,
                        lost:      row.get(5)?,
                        tied:      row.get(6)?,
                        no_result: row.get(7)?,
                        points:    row.get(8)?,
                        net_rate:  row.get(9)?,
                        position:  row.get(10)?,
                    },
                },
            ))
        })?.collect::<Result<Vec<_>, _>>()?;
        let standings = raw_standings
            .into_iter()
            .map(|(stage, mut standing)| {
                standing.stage = parse_stage(&stage)?;
                Ok(standing)
            })
            .collect::<SimResult<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT home_team_id, away_team_id, stage, grp, status FROM fixture ORDER BY id ASC"
        )?;
        let raw_fixtures = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?.collect::<Result<Vec<_>, _>>()?;
        let fixtures = raw_fixtures
            .into_iter()
            .map(|(home_team_id, away_team_id, stage, group, status)| {
                Ok(Fixture {
                    home_team_id,
                    away_team_id,
                    stage: parse_stage(&stage)?,
                    group,
                    status: parse_status(status)?,
                })
            })
            .collect::<SimResult<Vec<_>>>()?;

        Ok(TournamentSnapshot { teams, standings, fixtures })
    }

    // ── Outputs ────────────────────────────────────────────────

    /// Upsert every prediction row, stamped with the current UTC time.
    pub fn save_predictions(&mut self, predictions: &[PredictionRow]) -> SimResult<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        for p in predictions {
            tx.execute(
                "INSERT INTO prediction
                    (team_id, second_phase_pct, semifinal_pct, final_pct, champion_pct, confidence, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(team_id) DO UPDATE SET
                    second_phase_pct = excluded.second_phase_pct,
                    semifinal_pct = excluded.semifinal_pct,
                    final_pct = excluded.final_pct,
                    champion_pct = excluded.champion_pct,
                    confidence = excluded.confidence,
                    updated_at = excluded.updated_at",
                params![
                    p.team_id,
                    p.second_phase_pct,
                    p.semifinal_pct,
                    p.final_pct,
                    p.champion_pct,
                    p.confidence,
                    now,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Stored predictions sorted by championship percentage (desc),
    /// or None if nothing has been persisted yet.
    pub fn cached_predictions(&self) -> SimResult<Option<CachedPredictions>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.team_id, t.name, t.short_code, t.grp,
                    p.second_phase_pct, p.semifinal_pct, p.final_pct, p.champion_pct,
                    p.confidence, p.updated_at
             FROM prediction p JOIN team t ON t.team_id = p.team_id
             ORDER BY p.champion_pct DESC, t.rowid ASC"
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                PredictionRow {
                    team_id:          row.get(0)?,
                    team_name:        row.get(1)?,
                    short_code:       row.get(2)?,
                    group:            row.get(3)?,
                    second_phase_pct: row.get(4)?,
                    semifinal_pct:    row.get(5)?,
                    final_pct:        row.get(6)?,
                    champion_pct:     row.get(7)?,
                    confidence:       row.get(8)?,
                },
                row.get::<_, String>(9)?,
            ))
        })?.collect::<Result<Vec<_>, _>>()?;

        let Some(updated_at) = rows.iter().map(|(_, at)| at.clone()).max() else {
            return Ok(None);
        };
        Ok(Some(CachedPredictions {
            predictions: rows.into_iter().map(|(p, _)| p).collect(),
            updated_at,
        }))
    }

    /// Record run metadata for later inspection.
    pub fn record_run(&self, forecast: &Forecast, version: &str) -> SimResult<i64> {
        self.conn.execute(
            "INSERT INTO forecast_run
                (master_seed, trials_requested, trials_completed, trials_discarded, version, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                forecast.master_seed as i64,
                forecast.trials_requested as i64,
                forecast.trials_completed as i64,
                forecast.trials_discarded as i64,
                version,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn run_count(&self) -> SimResult<i64> {
        let count = self.conn
            .query_row("SELECT COUNT(*) FROM forecast_run", [], |row| row.get(0))
            .optional()?
            .unwrap_or(0);
        Ok(count)
    }
}

// ── Statements shared by the store and its transactions ───────

fn insert_team(conn: &Connection, team: &TeamRef) -> SimResult<()> {
    conn.execute(
        "INSERT INTO team (team_id, name, short_code, grp) VALUES (?1, ?2, ?3, ?4)",
        params![team.id, team.name, team.short_code, team.group],
    )?;
    Ok(())
}

fn upsert_standing(conn: &Connection, standing: &TeamStanding) -> SimResult<()> {
    let r = &standing.row;
    conn.execute(
        "INSERT INTO standing
            (team_id, grp, stage, played, won, lost, tied, no_result, points, net_rate, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(team_id) DO UPDATE SET
            grp = excluded.grp, stage = excluded.stage,
            played = excluded.played, won = excluded.won, lost = excluded.lost,
            tied = excluded.tied, no_result = excluded.no_result,
            points = excluded.points, net_rate = excluded.net_rate,
            position = excluded.position",
        params![
            standing.team_id,
            standing.group,
            standing.stage.as_str(),
            r.played,
            r.won,
            r.lost,
            r.tied,
            r.no_result,
            r.points,
            r.net_rate,
            r.position,
        ],
    )?;
    Ok(())
}

fn insert_fixture(conn: &Connection, fixture: &Fixture) -> SimResult<()> {
    conn.execute(
        "INSERT INTO fixture (home_team_id, away_team_id, stage, grp, status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            fixture.home_team_id,
            fixture.away_team_id,
            fixture.stage.as_str(),
            fixture.group,
            fixture.status.as_str(),
        ],
    )?;
    Ok(())
}

fn parse_stage(value: &str) -> SimResult<Stage> {
    Stage::parse(value).ok_or_else(|| SimError::UnknownValue { column: "stage", value: value.to_string() })
}

fn parse_status(value: String) -> SimResult<FixtureStatus> {
    FixtureStatus::parse(&value).ok_or(SimError::UnknownValue { column: "status", value })
}
