use clap::Args;
use storefront_app::{
    database::{self, Db},
    domain::members::{MembersService, PgMembersService, records::MemberUuid},
};

#[derive(Debug, Args)]
pub(crate) struct ShowMemberArgs {
    /// Member UUID
    member_uuid: MemberUuid,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ShowMemberArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let member = PgMembersService::new(Db::new(pool))
        .get_member(args.member_uuid)
        .await
        .map_err(|error| format!("failed to load member: {error}"))?;

    println!("member_uuid: {}", member.uuid);
    println!("member_name: {}", member.name);
    println!("mileage: {}", member.mileage);
    println!("created_at: {}", member.created_at);

    Ok(())
}
