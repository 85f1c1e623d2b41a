//! Account commands: balances.

use crate::api_client::ApiClient;
use crate::output;
use crate::GlobalOpts;

pub async fn balances(opts: &GlobalOpts) -> std::result::Result<(), String> {
    let client = ApiClient::new(&opts.api_endpoint, opts.api_token.clone(), opts.timeout_secs)
        .map_err(|e| e.to_string())?;
    let balances = client.balances().await.map_err(|e| e.to_string())?;

    if opts.json {
        output::print_json_value(&balances, true);
    } else {
        output::print_kv("Native", &output::display_json(&balances["native"]));
        output::print_kv("HOPR", &output::display_json(&balances["hopr"]));
    }

    Ok(())
}
