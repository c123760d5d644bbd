use serde_json::json;
use tracing::{debug, warn};

use vaulto_common::constants::{DAY_DATA_MAX_SKIP, DAY_DATA_PAGE_SIZE, MAX_HISTORY_DAYS};
use vaulto_common::error::{VaultoError, VaultoResult};
use vaulto_common::types::{is_evm_address, normalize_address, TokenDayData};

use crate::queries::TOKEN_DAY_DATA;
use crate::schema::{decode, DayDataPage};
use crate::UniswapModule;

const SECS_PER_DAY: i64 = 86_400;

/// `days` clamped to the supported window.
pub fn clamp_history_days(days: u32) -> u32 {
    days.clamp(1, MAX_HISTORY_DAYS)
}

/// Window start for a `days`-long history ending at `now` (unix seconds).
pub fn history_since(now: i64, days: u32) -> i64 {
    now - i64::from(clamp_history_days(days)) * SECS_PER_DAY
}

impl UniswapModule {
    /// Daily stats over the last `days` days, oldest first.
    /// Never fails: errors are logged and yield `[]`.
    pub async fn token_day_data(&self, chain_id: u64, address: &str, days: u32) -> Vec<TokenDayData> {
        let since = history_since(chrono::Utc::now().timestamp(), days);
        match self.try_token_day_data(chain_id, address, since).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(chain_id, address, error = %e, "day-data history failed");
                Vec::new()
            }
        }
    }

    /// Page through `tokenDayDatas` with `date >= since`.
    ///
    /// Stops on a short page, or once `skip` reaches the 10 000-row cap.
    pub async fn try_token_day_data(
        &self,
        chain_id: u64,
        address: &str,
        since: i64,
    ) -> VaultoResult<Vec<TokenDayData>> {
        if !is_evm_address(address) {
            return Err(VaultoError::InvalidAddress(address.to_string()));
        }
        let token = normalize_address(address);

        let mut rows = Vec::new();
        let mut skip = 0u32;
        loop {
            let vars = json!({
                "token": token,
                "since": since,
                "first": DAY_DATA_PAGE_SIZE,
                "skip": skip,
            });
            let data = self.transport.execute(chain_id, TOKEN_DAY_DATA, vars).await?;
            let page: DayDataPage = decode(data, "day-data page")?;
            let fetched = page.token_day_datas.len();
            rows.extend(page.token_day_datas.into_iter().map(TokenDayData::from));

            skip += DAY_DATA_PAGE_SIZE;
            if fetched < DAY_DATA_PAGE_SIZE as usize || skip >= DAY_DATA_MAX_SKIP {
                break;
            }
        }

        debug!(chain_id, token = %token, rows = rows.len(), "day-data history");
        Ok(rows)
    }
}
