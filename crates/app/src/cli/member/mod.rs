use clap::{Args, Subcommand};

mod create;
mod show;

#[derive(Debug, Args)]
pub(crate) struct MemberCommand {
    #[command(subcommand)]
    command: MemberSubcommand,
}

#[derive(Debug, Subcommand)]
enum MemberSubcommand {
    Create(create::CreateMemberArgs),
    Show(show::ShowMemberArgs),
}

pub(crate) async fn run(command: MemberCommand) -> Result<(), String> {
    match command.command {
        MemberSubcommand::Create(args) => create::run(args).await,
        MemberSubcommand::Show(args) => show::run(args).await,
    }
}
