//! Node commands: info, aliases.

use crate::api_client::ApiClient;
use crate::output;
use crate::GlobalOpts;

/// Display labels for the node info fields, in output order.
const INFO_FIELDS: [(&str, &str); 11] = [
    ("network", "Network"),
    ("announcedAddress", "Announced addresses"),
    ("listeningAddress", "Listening addresses"),
    ("chain", "Chain"),
    ("hoprToken", "HOPR token"),
    ("hoprChannels", "HOPR channels"),
    ("hoprNetworkRegistry", "Network registry"),
    ("hoprNodeSafeRegistry", "Node safe registry"),
    ("isEligible", "Eligible"),
    ("connectivityStatus", "Connectivity"),
    ("channelClosurePeriod", "Channel closure period (min)"),
];

fn client(opts: &GlobalOpts) -> std::result::Result<ApiClient, String> {
    ApiClient::new(&opts.api_endpoint, opts.api_token.clone(), opts.timeout_secs)
        .map_err(|e| e.to_string())
}

pub async fn info(opts: &GlobalOpts) -> std::result::Result<(), String> {
    let info = client(opts)?.node_info().await.map_err(|e| e.to_string())?;

    if opts.json {
        output::print_json_value(&info, true);
    } else {
        for (field, label) in INFO_FIELDS {
            output::print_kv(label, &output::display_json(&info[field]));
        }
    }

    Ok(())
}

pub async fn aliases(opts: &GlobalOpts) -> std::result::Result<(), String> {
    let aliases = client(opts)?.aliases().await.map_err(|e| e.to_string())?;

    let rows: Vec<Vec<String>> = aliases
        .into_iter()
        .map(|(alias, peer)| vec![alias, peer])
        .collect();
    output::print_table(&["alias", "peer_id"], &rows, opts.json);

    Ok(())
}
