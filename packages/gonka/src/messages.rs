//! Conversions from protobuf messages into [TxMessage].

use std::fmt::Display;

use cosmos_sdk_proto::{
    cosmos::{
        bank::v1beta1::MsgSend,
        base::v1beta1::Coin,
        gov::v1::{MsgVote, VoteOption},
    },
    traits::Message,
};

use crate::TxMessage;

impl From<MsgSend> for TxMessage {
    fn from(msg: MsgSend) -> Self {
        TxMessage::new(
            "/cosmos.bank.v1beta1.MsgSend",
            msg.encode_to_vec(),
            format!(
                "{} sending {} to {}",
                msg.from_address,
                PrettyCoins(msg.amount.as_slice()),
                msg.to_address,
            ),
        )
    }
}

impl From<MsgVote> for TxMessage {
    fn from(msg: MsgVote) -> Self {
        let option = VoteOption::try_from(msg.option)
            .map_or("unknown vote option", |option| option.as_str_name());
        TxMessage::new(
            "/cosmos.gov.v1.MsgVote",
            msg.encode_to_vec(),
            format!(
                "{} voting {option} on proposal {}",
                msg.voter, msg.proposal_id
            ),
        )
    }
}

pub(crate) struct PrettyCoins<'a>(pub(crate) &'a [Coin]);

impl Display for PrettyCoins<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (idx, Coin { denom, amount }) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{amount}{denom}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_message() {
        let msg = TxMessage::from(MsgSend {
            from_address: "gonka1from".to_owned(),
            to_address: "gonka1to".to_owned(),
            amount: vec![Coin {
                denom: "ngonka".to_owned(),
                amount: "1500".to_owned(),
            }],
        });
        assert_eq!(msg.type_url(), "/cosmos.bank.v1beta1.MsgSend");
        assert_eq!(msg.description(), "gonka1from sending 1500ngonka to gonka1to");
        let decoded = MsgSend::decode(msg.get_protobuf().value.as_slice()).unwrap();
        assert_eq!(decoded.to_address, "gonka1to");
    }

    #[test]
    fn vote_message() {
        let msg = TxMessage::from(MsgVote {
            proposal_id: 7,
            voter: "gonka1voter".to_owned(),
            option: VoteOption::Yes as i32,
            metadata: String::new(),
        });
        assert_eq!(msg.type_url(), "/cosmos.gov.v1.MsgVote");
        assert_eq!(
            msg.description(),
            "gonka1voter voting VOTE_OPTION_YES on proposal 7"
        );
    }
}
