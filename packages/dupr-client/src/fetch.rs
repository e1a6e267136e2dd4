//! Club-members and match-history fetches.
//!
//! Each fetch configures a [`PageRequest`], walks it with the [`Paginator`]
//! and decodes every hit into its record type.

use tracing::info;

use crate::client::DuprClient;
use crate::config::PaginationLimits;
use crate::error::Result;
use crate::mapper::decode_all;
use crate::pagination::{PageRequest, PageSource, Paged, Paginator};
use crate::types::{Match, Member};

pub fn club_members_path(club_id: &str) -> String {
    format!("club/{}/members/v1.0/all", club_id)
}

pub fn match_history_path(member_id: &str) -> String {
    format!("player/v1.0/{}/history", member_id)
}

/// All members of a club, up to `cap` records.
pub async fn club_members<S>(source: &S, club_id: &str, cap: u64) -> Result<Paged<Member>>
where
    S: PageSource + ?Sized,
{
    let mut request = PageRequest::club_members();
    let paged = Paginator::new(source)
        .with_cap(cap)
        .fetch_all(&club_members_path(club_id), &mut request)
        .await?;

    info!(club_id, members = paged.len(), pages = paged.pages, "Club members fetched");
    Ok(paged.map_items(decode_all::<Member>))
}

/// A member's most recent matches, up to `cap` records.
pub async fn match_history<S>(source: &S, member_id: &str, cap: u64) -> Result<Paged<Match>>
where
    S: PageSource + ?Sized,
{
    let mut request = PageRequest::match_history();
    let paged = Paginator::new(source)
        .with_cap(cap)
        .fetch_all(&match_history_path(member_id), &mut request)
        .await?;

    info!(member_id, matches = paged.len(), pages = paged.pages, "Match history fetched");
    Ok(paged.map_items(decode_all::<Match>))
}

impl DuprClient {
    /// Reload the session, then fetch every member of `club_id`.
    pub async fn club_members(
        &mut self,
        club_id: &str,
        limits: &PaginationLimits,
    ) -> Result<Paged<Member>> {
        info!(club_id, "Fetching club members");
        self.reload_session().await?;
        club_members(&*self, club_id, limits.club_members_cap).await
    }

    /// Reload the session, then fetch the match history of `member_id`.
    pub async fn match_history(
        &mut self,
        member_id: &str,
        limits: &PaginationLimits,
    ) -> Result<Paged<Match>> {
        info!(member_id, "Fetching match history");
        self.reload_session().await?;
        match_history(&*self, member_id, limits.match_history_cap).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Completion;
    use crate::testing::MockPageSource;
    use serde_json::json;

    #[tokio::test]
    async fn test_club_fetch_two_pages_for_fifteen_members() {
        let source = MockPageSource::uniform(15)
            .with_hits(|i| json!({"id": i, "fullName": format!("Member {}", i), "username": null}));

        let paged = club_members(&source, "8310950964", 1000).await.unwrap();

        assert_eq!(source.requested_offsets(), vec![0, 10]);
        assert_eq!(paged.len(), 15);
        assert_eq!(paged.items[14].full_name, "Member 14");
        assert_eq!(paged.items[0].username, "");
        assert!(matches!(paged.completion, Completion::Exhausted));

        let calls = source.calls();
        assert!(calls.iter().all(|c| c.path == "club/8310950964/members/v1.0/all"));
        assert_eq!(calls[0].request.sort.parameter, "fullNameSort");
        assert!(calls[0].request.filters.is_none());
    }

    #[tokio::test]
    async fn test_history_fetch_stops_at_cap() {
        let source = MockPageSource::uniform(500).with_hits(|i| json!({"matchId": i}));

        let paged = match_history(&source, "4383648392", 20).await.unwrap();

        assert_eq!(source.requested_offsets(), vec![0, 10]);
        assert_eq!(paged.len(), 20);
        assert_eq!(paged.items[19].match_id, 19);
        assert!(paged.is_capped());

        let calls = source.calls();
        assert_eq!(calls[0].path, "player/v1.0/4383648392/history");
        assert_eq!(calls[0].request.sort.parameter, "MATCH_DATE");
    }

    #[tokio::test]
    async fn test_partial_fetch_keeps_decoded_members() {
        let source = MockPageSource::uniform(30)
            .with_hits(|i| json!({"fullName": format!("M{}", i)}))
            .fail_at(10);

        let paged = club_members(&source, "1", 1000).await.unwrap();

        assert!(paged.is_partial());
        assert_eq!(paged.len(), 10);
        assert_eq!(paged.items[9].full_name, "M9");
    }
}
