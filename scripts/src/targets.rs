//! The fixed Moloch contract dependency graph
//!
//! Two contracts, deployed in order: the ERC-20 token, then the Moloch
//! governance contract, whose constructor takes the token's address.

use ethers::abi::Token;

use crate::{
    cli::DeployAllArgs,
    constants::{MOLOCH_CONTRACT_KEY, TOKEN_CONTRACT_KEY},
    errors::ScriptError,
    orchestrator::{ArgBuilder, ArgContext, DeploymentTarget},
};

/// Builds the ordered target list for a `deploy-all` run.
///
/// The Moloch's constructor arguments are, in order: the summoner (the
/// deployer wallet), the approved token's address, the period duration,
/// the voting period length, the grace period length, the abort window,
/// and the dilution bound.
pub fn moloch_deployment_targets(
    args: &DeployAllArgs,
) -> Result<Vec<DeploymentTarget>, ScriptError> {
    let token_supply = ethers::types::U256::from_dec_str(&args.token_supply)
        .map_err(|e| ScriptError::ArgumentMismatch(format!("invalid token supply: {}", e)))?;

    let token = DeploymentTarget {
        name: TOKEN_CONTRACT_KEY.to_string(),
        artifact_path: args.token_artifact.clone(),
        dependencies: Vec::new(),
        build_args: Box::new(move |_: &ArgContext<'_>| Ok(vec![Token::Uint(token_supply)]))
            as ArgBuilder,
    };

    let period_duration = args.period_duration;
    let voting_period_length = args.voting_period_length;
    let grace_period_length = args.grace_period_length;
    let abort_window = args.abort_window;
    let dilution_bound = args.dilution_bound;

    let moloch = DeploymentTarget {
        name: MOLOCH_CONTRACT_KEY.to_string(),
        artifact_path: args.moloch_artifact.clone(),
        dependencies: vec![TOKEN_CONTRACT_KEY.to_string()],
        build_args: Box::new(move |ctx: &ArgContext<'_>| {
            Ok(vec![
                Token::Address(ctx.deployer()),
                Token::Address(ctx.address_of(TOKEN_CONTRACT_KEY)?),
                Token::Uint(period_duration.into()),
                Token::Uint(voting_period_length.into()),
                Token::Uint(grace_period_length.into()),
                Token::Uint(abort_window.into()),
                Token::Uint(dilution_bound.into()),
            ])
        }) as ArgBuilder,
    };

    Ok(vec![token, moloch])
}

#[cfg(test)]
#[allow(clippy::missing_docs_in_private_items)]
mod tests {
    use std::path::PathBuf;

    use ethers::{
        abi::Token,
        types::{Address, U256},
    };

    use super::moloch_deployment_targets;
    use crate::{
        cli::DeployAllArgs,
        constants::{
            DEFAULT_ABORT_WINDOW, DEFAULT_DILUTION_BOUND, DEFAULT_GRACE_PERIOD_LENGTH,
            DEFAULT_PERIOD_DURATION, DEFAULT_TOKEN_SUPPLY, DEFAULT_VOTING_PERIOD_LENGTH,
            TOKEN_CONTRACT_KEY,
        },
        deployments::AddressBook,
        errors::ScriptError,
        orchestrator::ArgContext,
    };

    fn default_args() -> DeployAllArgs {
        DeployAllArgs {
            token_supply: DEFAULT_TOKEN_SUPPLY.to_string(),
            period_duration: DEFAULT_PERIOD_DURATION,
            voting_period_length: DEFAULT_VOTING_PERIOD_LENGTH,
            grace_period_length: DEFAULT_GRACE_PERIOD_LENGTH,
            abort_window: DEFAULT_ABORT_WINDOW,
            dilution_bound: DEFAULT_DILUTION_BOUND,
            token_artifact: PathBuf::from("Token.json"),
            moloch_artifact: PathBuf::from("Moloch.json"),
        }
    }

    #[test]
    fn token_constructor_takes_the_total_supply() {
        let targets = moloch_deployment_targets(&default_args()).unwrap();
        let book = AddressBook::in_memory();
        let ctx = ArgContext::new(Address::from_low_u64_be(1), &book);

        let args = (targets[0].build_args)(&ctx).unwrap();
        assert_eq!(args, vec![Token::Uint(U256::exp10(26))]);
    }

    #[test]
    fn moloch_constructor_args_are_ordered() {
        let targets = moloch_deployment_targets(&default_args()).unwrap();

        let summoner = Address::from_low_u64_be(0xaa);
        let token_address = Address::from_low_u64_be(0xbb);
        let mut book = AddressBook::in_memory();
        book.record_resolved(TOKEN_CONTRACT_KEY, token_address);
        let ctx = ArgContext::new(summoner, &book);

        let args = (targets[1].build_args)(&ctx).unwrap();
        assert_eq!(
            args,
            vec![
                Token::Address(summoner),
                Token::Address(token_address),
                Token::Uint(300u64.into()),
                Token::Uint(1u64.into()),
                Token::Uint(1u64.into()),
                Token::Uint(1u64.into()),
                Token::Uint(3u64.into()),
            ],
        );
    }

    #[test]
    fn moloch_builder_requires_the_token_address() {
        let targets = moloch_deployment_targets(&default_args()).unwrap();
        let book = AddressBook::in_memory();
        let ctx = ArgContext::new(Address::from_low_u64_be(1), &book);

        let err = (targets[1].build_args)(&ctx).unwrap_err();
        assert!(matches!(err, ScriptError::ArgumentMismatch(_)));
    }

    #[test]
    fn invalid_token_supply_is_rejected() {
        let mut args = default_args();
        args.token_supply = "not a number".to_string();
        let err = moloch_deployment_targets(&args).unwrap_err();
        assert!(matches!(err, ScriptError::ArgumentMismatch(_)));
    }
}
