pub mod secp256k1;
