use clap::Args;
use storefront_app::{
    database::{self, Db},
    domain::members::{
        MembersService, PgMembersService,
        data::NewMember,
        records::MemberUuid,
    },
};

#[derive(Debug, Args)]
pub(crate) struct CreateMemberArgs {
    /// Member display name
    #[arg(long)]
    name: String,

    /// Opening mileage balance
    #[arg(long, default_value_t = 0)]
    mileage: u64,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Member UUID as issued by the identity provider; generated when omitted
    #[arg(long)]
    member_uuid: Option<MemberUuid>,
}

pub(crate) async fn run(args: CreateMemberArgs) -> Result<(), String> {
    if args.name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgMembersService::new(Db::new(pool));

    let member = service
        .create_member(NewMember {
            uuid: args.member_uuid.unwrap_or_default(),
            name: args.name,
            mileage: args.mileage,
        })
        .await
        .map_err(|error| format!("failed to create member: {error}"))?;

    println!("member_uuid: {}", member.uuid);
    println!("member_name: {}", member.name);
    println!("mileage: {}", member.mileage);

    Ok(())
}
