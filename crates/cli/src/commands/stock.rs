use anyhow::Result;
use vaulto_utils::output::{render, OutputFormat};

use crate::factory;

/// `vaulto stock <ticker | xStock | address>`.
pub async fn stock(input: &str, fmt: OutputFormat) -> Result<()> {
    let market = factory::market()?;
    let data = market.stock_data(input).await?;
    render(fmt, &data)
}
