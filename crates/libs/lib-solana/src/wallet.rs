//! # Wallet Capability
//!
//! The donation core never talks to a browser wallet adapter directly; it consumes
//! the [`WalletProvider`] trait. [`KeypairWallet`] is the local implementation used
//! by the host binary: it signs with a keypair file and forwards every network call
//! to [`SolanaClient`].

use crate::client::SolanaClient;
use crate::types::{LatestBlockhash, SendOptions};
use async_trait::async_trait;
use lib_core::{AppError, Result};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument};

/// Capability surface of a connected wallet plus the connection it uses.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Public key of the connected account, `None` while disconnected.
    fn public_key(&self) -> Option<Pubkey>;

    /// Connect the wallet and return its public key.
    async fn connect(&self) -> Result<Pubkey>;

    /// Disconnect the wallet. `public_key` returns `None` afterwards.
    async fn disconnect(&self) -> Result<()>;

    async fn get_balance(&self, pubkey: &Pubkey, commitment: CommitmentConfig) -> Result<u64>;

    async fn get_latest_blockhash(&self, commitment: CommitmentConfig) -> Result<LatestBlockhash>;

    async fn get_fee_for_message(&self, message: &Message) -> Result<u64>;

    /// Sign `transaction` and hand it to the network. Returns once the node
    /// accepted it, not once it is confirmed.
    async fn send_transaction(&self, transaction: Transaction, options: SendOptions) -> Result<Signature>;

    /// Resolve once `signature` is confirmed or its blockhash has expired.
    ///
    /// `Ok(Some(reason))` means the transaction landed but failed on-chain.
    async fn confirm_transaction(&self, signature: &Signature, blockhash: &LatestBlockhash) -> Result<Option<String>>;
}

/// Wallet backed by a local keypair and the RPC client.
pub struct KeypairWallet {
    keypair: Keypair,
    client: SolanaClient,
    connected: AtomicBool,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair, client: SolanaClient) -> Self {
        Self {
            keypair,
            client,
            connected: AtomicBool::new(false),
        }
    }

    /// Load a keypair from a JSON keypair file (Solana CLI format).
    pub fn from_file(path: &Path, client: SolanaClient) -> Result<Self> {
        let keypair = read_keypair_file(path)
            .map_err(|e| AppError::Config(format!("Failed to read keypair {}: {}", path.display(), e)))?;
        Ok(Self::new(keypair, client))
    }

    /// Load a keypair from a base58-encoded 64-byte secret key.
    pub fn from_base58(secret: &str, client: SolanaClient) -> Result<Self> {
        let bytes = bs58::decode(secret.trim())
            .into_vec()
            .map_err(|e| AppError::Config(format!("Invalid base58 keypair: {}", e)))?;
        let keypair = Keypair::try_from(bytes.as_slice())
            .map_err(|e| AppError::Config(format!("Invalid keypair bytes: {}", e)))?;
        Ok(Self::new(keypair, client))
    }

    pub fn client(&self) -> &SolanaClient {
        &self.client
    }
}

#[async_trait]
impl WalletProvider for KeypairWallet {
    fn public_key(&self) -> Option<Pubkey> {
        self.connected
            .load(Ordering::Acquire)
            .then(|| self.keypair.pubkey())
    }

    async fn connect(&self) -> Result<Pubkey> {
        self.connected.store(true, Ordering::Release);
        let pubkey = self.keypair.pubkey();
        info!(%pubkey, "Wallet connected");
        Ok(pubkey)
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::Release);
        info!("Wallet disconnected");
        Ok(())
    }

    async fn get_balance(&self, pubkey: &Pubkey, commitment: CommitmentConfig) -> Result<u64> {
        self.client.get_balance(pubkey, commitment).await
    }

    async fn get_latest_blockhash(&self, commitment: CommitmentConfig) -> Result<LatestBlockhash> {
        self.client.get_latest_blockhash(commitment).await
    }

    async fn get_fee_for_message(&self, message: &Message) -> Result<u64> {
        self.client.get_fee_for_message(message).await
    }

    #[instrument(skip_all)]
    async fn send_transaction(&self, mut transaction: Transaction, options: SendOptions) -> Result<Signature> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(AppError::Validation("Wallet is not connected".to_string()));
        }

        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_sign(&[&self.keypair], blockhash)
            .map_err(|e| AppError::Internal(format!("Failed to sign transaction: {}", e)))?;

        self.client.send_transaction(&transaction, options).await
    }

    async fn confirm_transaction(&self, signature: &Signature, blockhash: &LatestBlockhash) -> Result<Option<String>> {
        self.client
            .confirm_transaction(signature, blockhash, CommitmentConfig::confirmed())
            .await
    }
}
