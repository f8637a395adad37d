// crates/laptop-cli/src/commands/login.rs
//
// `laptop login`: log in and print the access token.

use laptop_rpc::AuthClient;

use super::ConnectOpts;

/// Run the login command.
pub async fn run(opts: &ConnectOpts) -> Result<(), Box<dyn std::error::Error>> {
    let Some(username) = &opts.username else {
        return Err("login requires --username".into());
    };

    let channel = opts.channel().await?;
    let mut auth = AuthClient::new(channel, username.as_str(), opts.password.as_str());
    let token = auth.login().await?;

    println!("{}", token);
    Ok(())
}
