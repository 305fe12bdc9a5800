use serde::{Deserialize, Serialize};

/// Nested reference object (`player`, `team`, `game`) inside a stat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
}

/// Box-score line as returned by the upstream `/stats` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiPlayerStat {
    pub player: EntityRef,
    pub team: EntityRef,
    pub game: EntityRef,
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub pts: Option<i32>,
    #[serde(default)]
    pub reb: Option<i32>,
    #[serde(default)]
    pub ast: Option<i32>,
    #[serde(default)]
    pub stl: Option<i32>,
    #[serde(default)]
    pub blk: Option<i32>,
    #[serde(default)]
    pub turnover: Option<i32>,
    #[serde(default)]
    pub pf: Option<i32>,
    #[serde(default)]
    pub fgm: Option<i32>,
    #[serde(default)]
    pub fga: Option<i32>,
    #[serde(default)]
    pub fg3m: Option<i32>,
    #[serde(default)]
    pub ftm: Option<i32>,
    #[serde(default)]
    pub fta: Option<i32>,
}

/// Stored stat line, keyed by `(player_id, game_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub player_id: i64,
    pub game_id: i64,
    pub team_id: i64,
    pub min: Option<String>,
    pub pts: Option<i32>,
    pub reb: Option<i32>,
    pub ast: Option<i32>,
    pub stl: Option<i32>,
    pub blk: Option<i32>,
    pub tov: Option<i32>,
    pub pf: Option<i32>,
    pub fgm: Option<i32>,
    pub fga: Option<i32>,
    pub fg3m: Option<i32>,
    pub ftm: Option<i32>,
    pub fta: Option<i32>,
}

impl From<&ApiPlayerStat> for PlayerStatLine {
    fn from(stat: &ApiPlayerStat) -> Self {
        PlayerStatLine {
            player_id: stat.player.id,
            game_id: stat.game.id,
            team_id: stat.team.id,
            min: stat.min.clone(),
            pts: stat.pts,
            reb: stat.reb,
            ast: stat.ast,
            stl: stat.stl,
            blk: stat.blk,
            tov: stat.turnover,
            pf: stat.pf,
            fgm: stat.fgm,
            fga: stat.fga,
            fg3m: stat.fg3m,
            ftm: stat.ftm,
            fta: stat.fta,
        }
    }
}
