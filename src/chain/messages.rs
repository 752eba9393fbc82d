//! Typed transaction message envelopes.
//!
//! Each message is a protobuf payload wrapped in an `Any` carrying its type
//! URL. Field numbers follow the chain's `blogchain.blog.v1` and
//! `cosmos.bank.v1beta1` protobuf definitions.

use cosmrs::Any;
use prost::Message;

use crate::chain::types::{ChainError, ChainResult, Coin};
use crate::config::{FeeConfig, FeeSchedule};

pub const CREATE_POST_TYPE_URL: &str = "/blogchain.blog.v1.MsgCreatePost";
pub const LIKE_POST_TYPE_URL: &str = "/blogchain.blog.v1.MsgLikePost";
pub const SEND_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";

#[derive(Clone, PartialEq, Message)]
pub struct MsgCreatePost {
    #[prost(string, tag = "1")]
    pub creator: String,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, tag = "3")]
    pub body: String,
    #[prost(string, repeated, tag = "4")]
    pub tags: Vec<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgLikePost {
    #[prost(string, tag = "1")]
    pub liker: String,
    #[prost(uint64, tag = "2")]
    pub post_id: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct ProtoCoin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgSend {
    #[prost(string, tag = "1")]
    pub from_address: String,
    #[prost(string, tag = "2")]
    pub to_address: String,
    #[prost(message, repeated, tag = "3")]
    pub amount: Vec<ProtoCoin>,
}

/// The kinds of state-changing message this client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    CreatePost,
    LikePost,
    SendTokens,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::CreatePost => "create_post",
            MessageKind::LikePost => "like_post",
            MessageKind::SendTokens => "send_tokens",
        }
    }

    /// Fixed memo attached to transactions of this kind.
    pub fn memo(&self) -> &'static str {
        match self {
            MessageKind::CreatePost => "Creating blog post",
            MessageKind::LikePost => "Liking post",
            MessageKind::SendTokens => "Token transfer",
        }
    }

    /// Flat fee for this kind from the schedule.
    pub fn fee<'a>(&self, schedule: &'a FeeSchedule) -> &'a FeeConfig {
        match self {
            MessageKind::CreatePost => &schedule.create_post,
            MessageKind::LikePost => &schedule.like_post,
            MessageKind::SendTokens => &schedule.send_tokens,
        }
    }
}

/// A message ready to be placed in a transaction body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxMessage {
    CreatePost {
        creator: String,
        title: String,
        body: String,
        tags: Vec<String>,
    },
    LikePost {
        liker: String,
        post_id: String,
    },
    Send {
        from_address: String,
        to_address: String,
        amount: Vec<Coin>,
    },
}

impl TxMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            TxMessage::CreatePost { .. } => MessageKind::CreatePost,
            TxMessage::LikePost { .. } => MessageKind::LikePost,
            TxMessage::Send { .. } => MessageKind::SendTokens,
        }
    }

    pub fn type_url(&self) -> &'static str {
        match self {
            TxMessage::CreatePost { .. } => CREATE_POST_TYPE_URL,
            TxMessage::LikePost { .. } => LIKE_POST_TYPE_URL,
            TxMessage::Send { .. } => SEND_TYPE_URL,
        }
    }

    /// Address that must sign this message.
    pub fn signer(&self) -> &str {
        match self {
            TxMessage::CreatePost { creator, .. } => creator,
            TxMessage::LikePost { liker, .. } => liker,
            TxMessage::Send { from_address, .. } => from_address,
        }
    }

    /// Encode into a type-tagged protobuf envelope.
    pub fn to_any(&self) -> ChainResult<Any> {
        let value = match self {
            TxMessage::CreatePost { creator, title, body, tags } => MsgCreatePost {
                creator: creator.clone(),
                title: title.clone(),
                body: body.clone(),
                tags: tags.clone(),
            }
            .encode_to_vec(),
            TxMessage::LikePost { liker, post_id } => {
                let post_id = post_id.trim().parse::<u64>().map_err(|_| {
                    ChainError::InvalidInput(format!("post id '{}' is not an integer", post_id))
                })?;
                MsgLikePost {
                    liker: liker.clone(),
                    post_id,
                }
                .encode_to_vec()
            }
            TxMessage::Send { from_address, to_address, amount } => {
                for coin in amount {
                    if coin.amount.parse::<u128>().is_err() {
                        return Err(ChainError::InvalidInput(format!(
                            "amount '{}' is not an integer",
                            coin.amount
                        )));
                    }
                }
                MsgSend {
                    from_address: from_address.clone(),
                    to_address: to_address.clone(),
                    amount: amount
                        .iter()
                        .map(|c| ProtoCoin {
                            denom: c.denom.clone(),
                            amount: c.amount.clone(),
                        })
                        .collect(),
                }
                .encode_to_vec()
            }
        };

        Ok(Any {
            type_url: self.type_url().to_string(),
            value,
        })
    }
}
