use c2dm::*;

use argparse::{ArgumentParser, Collect, Store, StoreOption, StoreTrue};

#[tokio::main]
async fn main() -> Result<(), C2dmError> {
    let mut registration_id = String::new();
    let mut collapse_key = String::new();
    let mut login_token = String::new();
    let mut endpoint: Option<String> = None;
    let mut delay_while_idle = false;
    let mut data: Vec<String> = Vec::new();

    {
        let mut ap = ArgumentParser::new();
        ap.set_description("A C2DM message sender");

        ap.refer(&mut login_token)
            .add_option(&["-t", "--login_token"], Store, "ClientLogin auth token for the ac2dm service")
            .required();

        ap.refer(&mut registration_id)
            .add_option(&["-r", "--registration_id"], Store, "Registration id of the target device")
            .required();

        ap.refer(&mut collapse_key)
            .add_option(&["-c", "--collapse_key"], Store, "Collapse key of the message")
            .required();

        ap.refer(&mut endpoint)
            .add_option(&["-e", "--endpoint"], StoreOption, "Override the C2DM send URI");

        ap.refer(&mut delay_while_idle)
            .add_option(&["-d", "--delay_while_idle"], StoreTrue, "Hold the message while the device is idle");

        ap.refer(&mut data)
            .add_argument("data", Collect, "Payload entries as key=value");

        ap.parse_args_or_exit();
    }

    let data: Vec<(String, String)> = data
        .iter()
        .filter_map(|entry| entry.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let message = Message::new(registration_id, collapse_key, data);

    let mut client = C2dmClient::new();
    client.set_login_token(login_token);
    client.set_delay_while_idle(delay_while_idle);

    if let Some(endpoint) = endpoint {
        client.set_endpoint(endpoint);
    }

    match client.send_message(&message).await {
        Ok(receipt) => println!("Sent: {:?}", receipt),
        Err(error) if error.is_retryable() => {
            println!("Unavailable, retry after {:?}: {}", error.retry_after(), error)
        }
        Err(error) => {
            println!("Error: {}", error);
            println!("Response: {:?}", client.last_response());
            return Err(error);
        }
    }

    Ok(())
}
