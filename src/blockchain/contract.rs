//! Bindings for the deployed vault contract.

use alloy::sol;

sol! {
    /// Vault holding per-account deposits, an owner-settable value and a pause flag.
    #[sol(rpc)]
    #[derive(Debug)]
    interface IVault {
        /// Emitted when ether is deposited.
        event Deposit(address indexed sender, uint256 amount);

        /// Emitted when ether is withdrawn.
        event Withdrawal(address indexed recipient, uint256 amount);

        /// Emitted when the stored value changes.
        event ValueSet(uint256 newValue);

        function getBalance(address account) external view returns (uint256);
        function getContractBalance() external view returns (uint256);
        function value() external view returns (uint256);
        function paused() external view returns (bool);
        function owner() external view returns (address);

        function deposit() external payable;
        function withdraw(uint256 amount) external;
        function setValue(uint256 newValue) external;
        function setPaused(bool paused) external;
    }
}
